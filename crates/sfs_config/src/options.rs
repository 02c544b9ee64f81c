//! Closed option sets for project configuration.
//!
//! Every enum serializes to its canonical label, the string templates compare
//! against (`if_build_tool("Maven", ...)`). Parsing accepts the label or a
//! short lowercase alias.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Build tool used by the generated project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum BuildTool {
    #[default]
    #[serde(rename = "Maven", alias = "maven")]
    Maven,
    #[serde(rename = "Gradle", alias = "gradle")]
    Gradle,
}

impl BuildTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildTool::Maven => "Maven",
            BuildTool::Gradle => "Gradle",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Maven" | "maven" => Some(BuildTool::Maven),
            "Gradle" | "gradle" => Some(BuildTool::Gradle),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[BuildTool::Maven, BuildTool::Gradle]
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Frontend stack rendered alongside the Spring backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FrontendFramework {
    #[default]
    #[serde(rename = "React with Inertia.js", alias = "react", alias = "React avec Inertia.js")]
    ReactInertia,
    #[serde(rename = "Vue.js with Inertia.js", alias = "vue", alias = "Vue.js avec Inertia.js")]
    VueInertia,
    #[serde(rename = "Angular", alias = "angular")]
    Angular,
    #[serde(rename = "Thymeleaf", alias = "thymeleaf")]
    Thymeleaf,
    #[serde(rename = "JTE", alias = "jte")]
    Jte,
    /// API-only project.
    #[serde(rename = "None (API only)", alias = "none", alias = "Aucun (API seulement)")]
    None,
}

impl FrontendFramework {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrontendFramework::ReactInertia => "React with Inertia.js",
            FrontendFramework::VueInertia => "Vue.js with Inertia.js",
            FrontendFramework::Angular => "Angular",
            FrontendFramework::Thymeleaf => "Thymeleaf",
            FrontendFramework::Jte => "JTE",
            FrontendFramework::None => "None (API only)",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "React with Inertia.js" | "React avec Inertia.js" | "react" => {
                Some(FrontendFramework::ReactInertia)
            }
            "Vue.js with Inertia.js" | "Vue.js avec Inertia.js" | "vue" => {
                Some(FrontendFramework::VueInertia)
            }
            "Angular" | "angular" => Some(FrontendFramework::Angular),
            "Thymeleaf" | "thymeleaf" => Some(FrontendFramework::Thymeleaf),
            "JTE" | "jte" => Some(FrontendFramework::Jte),
            "None (API only)" | "Aucun (API seulement)" | "none" => Some(FrontendFramework::None),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            FrontendFramework::ReactInertia,
            FrontendFramework::VueInertia,
            FrontendFramework::Angular,
            FrontendFramework::Thymeleaf,
            FrontendFramework::Jte,
            FrontendFramework::None,
        ]
    }
}

impl fmt::Display for FrontendFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Database backing the generated application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Database {
    #[serde(rename = "MySQL", alias = "mysql")]
    MySql,
    #[default]
    #[serde(rename = "PostgreSQL", alias = "postgresql")]
    PostgreSql,
    #[serde(rename = "MongoDB", alias = "mongodb")]
    MongoDb,
    /// Embedded in-memory database.
    #[serde(rename = "H2", alias = "h2")]
    H2,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Database::MySql => "MySQL",
            Database::PostgreSql => "PostgreSQL",
            Database::MongoDb => "MongoDB",
            Database::H2 => "H2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MySQL" | "mysql" => Some(Database::MySql),
            "PostgreSQL" | "postgresql" => Some(Database::PostgreSql),
            "MongoDB" | "mongodb" => Some(Database::MongoDb),
            "H2" | "h2" => Some(Database::H2),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Database::MySql,
            Database::PostgreSql,
            Database::MongoDb,
            Database::H2,
        ]
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional feature flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    #[serde(rename = "openapi")]
    OpenApi,
    Docker,
    Tests,
    Websocket,
    Redis,
    Elasticsearch,
    Kafka,
    Rabbitmq,
    #[serde(rename = "graphql")]
    GraphQl,
    Prometheus,
    AuthSocial,
    Pwa,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::OpenApi => "openapi",
            Feature::Docker => "docker",
            Feature::Tests => "tests",
            Feature::Websocket => "websocket",
            Feature::Redis => "redis",
            Feature::Elasticsearch => "elasticsearch",
            Feature::Kafka => "kafka",
            Feature::Rabbitmq => "rabbitmq",
            Feature::GraphQl => "graphql",
            Feature::Prometheus => "prometheus",
            Feature::AuthSocial => "auth-social",
            Feature::Pwa => "pwa",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.as_str() == s)
    }

    pub fn all() -> &'static [Self] {
        &[
            Feature::OpenApi,
            Feature::Docker,
            Feature::Tests,
            Feature::Websocket,
            Feature::Redis,
            Feature::Elasticsearch,
            Feature::Kafka,
            Feature::Rabbitmq,
            Feature::GraphQl,
            Feature::Prometheus,
            Feature::AuthSocial,
            Feature::Pwa,
        ]
    }

    /// Features enabled when the caller does not say otherwise.
    pub fn defaults() -> Vec<Self> {
        vec![Feature::OpenApi, Feature::Docker, Feature::Tests]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
