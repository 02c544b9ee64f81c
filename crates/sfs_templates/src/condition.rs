//! Render conditions: pure predicates over a [`ConfigModel`].
//!
//! Conditions are plain values. They can be built long before a configuration
//! exists (e.g. in a table of optional templates) and are evaluated lazily with
//! [`evaluate_condition`].

use sfs_config::{BuildTool, ConfigModel, Database, Feature, FrontendFramework};

/// A predicate deciding whether some template content applies to a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RenderCondition {
    Frontend(FrontendFramework),
    Database(Database),
    BuildTool(BuildTool),
    Feature(Feature),
    Auth,
    Not(Box<RenderCondition>),
    /// True when every inner condition holds (true when empty).
    All(Vec<RenderCondition>),
    /// True when at least one inner condition holds (false when empty).
    Any(Vec<RenderCondition>),
}

impl RenderCondition {
    /// Pick `then` when the condition holds for `config`, `otherwise` if not.
    pub fn select<'a>(&self, config: &ConfigModel, then: &'a str, otherwise: &'a str) -> &'a str {
        if evaluate_condition(self, config) {
            then
        } else {
            otherwise
        }
    }
}

impl std::ops::Not for RenderCondition {
    type Output = RenderCondition;

    fn not(self) -> Self::Output {
        not(self)
    }
}

pub fn is_frontend(frontend: FrontendFramework) -> RenderCondition {
    RenderCondition::Frontend(frontend)
}

pub fn is_database(database: Database) -> RenderCondition {
    RenderCondition::Database(database)
}

pub fn is_build_tool(build_tool: BuildTool) -> RenderCondition {
    RenderCondition::BuildTool(build_tool)
}

pub fn has_feature(feature: Feature) -> RenderCondition {
    RenderCondition::Feature(feature)
}

pub fn has_auth() -> RenderCondition {
    RenderCondition::Auth
}

pub fn not(condition: RenderCondition) -> RenderCondition {
    RenderCondition::Not(Box::new(condition))
}

pub fn and(conditions: impl IntoIterator<Item = RenderCondition>) -> RenderCondition {
    RenderCondition::All(conditions.into_iter().collect())
}

pub fn or(conditions: impl IntoIterator<Item = RenderCondition>) -> RenderCondition {
    RenderCondition::Any(conditions.into_iter().collect())
}

/// Evaluate a condition against a configuration.
///
/// `All` and `Any` short-circuit in argument order.
pub fn evaluate_condition(condition: &RenderCondition, config: &ConfigModel) -> bool {
    match condition {
        RenderCondition::Frontend(frontend) => config.frontend_framework == *frontend,
        RenderCondition::Database(database) => config.database == *database,
        RenderCondition::BuildTool(build_tool) => config.build_tool == *build_tool,
        RenderCondition::Feature(feature) => config.has_feature(*feature),
        RenderCondition::Auth => config.include_auth,
        RenderCondition::Not(inner) => !evaluate_condition(inner, config),
        RenderCondition::All(inner) => inner.iter().all(|c| evaluate_condition(c, config)),
        RenderCondition::Any(inner) => inner.iter().any(|c| evaluate_condition(c, config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConfigModel {
        ConfigModel {
            build_tool: BuildTool::Maven,
            frontend_framework: FrontendFramework::VueInertia,
            database: Database::MySql,
            additional_features: vec![Feature::Docker, Feature::Redis],
            include_auth: true,
            ..ConfigModel::default()
        }
    }

    #[test]
    fn test_leaf_predicates() {
        let cfg = config();
        assert!(evaluate_condition(&is_frontend(FrontendFramework::VueInertia), &cfg));
        assert!(!evaluate_condition(&is_frontend(FrontendFramework::Angular), &cfg));
        assert!(evaluate_condition(&is_database(Database::MySql), &cfg));
        assert!(!evaluate_condition(&is_database(Database::H2), &cfg));
        assert!(evaluate_condition(&is_build_tool(BuildTool::Maven), &cfg));
        assert!(evaluate_condition(&has_feature(Feature::Redis), &cfg));
        assert!(!evaluate_condition(&has_feature(Feature::Kafka), &cfg));
        assert!(evaluate_condition(&has_auth(), &cfg));
    }

    #[test]
    fn test_combinators() {
        let cfg = config();
        let docker_on_maven = and([is_build_tool(BuildTool::Maven), has_feature(Feature::Docker)]);
        assert!(evaluate_condition(&docker_on_maven, &cfg));

        let gradle = ConfigModel {
            build_tool: BuildTool::Gradle,
            ..config()
        };
        assert!(!evaluate_condition(&docker_on_maven, &gradle));

        let no_docker = ConfigModel {
            additional_features: vec![Feature::Redis],
            ..config()
        };
        assert!(!evaluate_condition(&docker_on_maven, &no_docker));

        let either = or([has_feature(Feature::Kafka), has_feature(Feature::Redis)]);
        assert!(evaluate_condition(&either, &cfg));
        assert!(!evaluate_condition(&not(either), &cfg));
    }

    #[test]
    fn test_empty_combinators() {
        let cfg = config();
        assert!(evaluate_condition(&and([]), &cfg));
        assert!(!evaluate_condition(&or([]), &cfg));
    }

    #[test]
    fn test_not_operator() {
        let cfg = config();
        assert!(evaluate_condition(&!has_feature(Feature::Kafka), &cfg));
        assert!(evaluate_condition(&!!has_auth(), &cfg));
    }

    #[test]
    fn test_select() {
        let cfg = config();
        assert_eq!(has_auth().select(&cfg, "secured", "open"), "secured");
        assert_eq!(
            is_database(Database::MongoDb).select(&cfg, "mongo", "jpa"),
            "jpa"
        );
    }
}
