//! The canonical project configuration and its validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::advanced::AdvancedConfig;
use crate::error::ConfigResult;
use crate::options::{BuildTool, Database, Feature, FrontendFramework};

/// Default authentication mechanism.
pub const DEFAULT_AUTH_TYPE: &str = "JWT";

/// Keys owned by [`ConfigModel`]; anything else is passed through in `extra`.
const KNOWN_KEYS: &[&str] = &[
    "appName",
    "packageName",
    "buildTool",
    "frontendFramework",
    "database",
    "includeAuth",
    "authType",
    "additionalFeatures",
    "serverPort",
    "javaVersion",
    "springBootVersion",
    "nodeVersion",
    "npmVersion",
    "advancedConfig",
];

/// Validated project configuration.
///
/// Only [`validate`] and [`extend`] produce values of this type from user
/// input, so every enum field is a member of its option set and
/// `additional_features` holds no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigModel {
    pub app_name: String,
    pub package_name: String,
    pub build_tool: BuildTool,
    pub frontend_framework: FrontendFramework,
    pub database: Database,
    pub include_auth: bool,
    pub auth_type: String,
    pub additional_features: Vec<Feature>,
    pub server_port: u16,
    pub java_version: String,
    pub spring_boot_version: String,
    pub node_version: String,
    pub npm_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_config: Option<AdvancedConfig>,
    /// Unrecognized keys from the raw input, untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ConfigModel {
    fn default() -> Self {
        Self {
            app_name: "sfs-app".to_string(),
            package_name: "com.example.app".to_string(),
            build_tool: BuildTool::default(),
            frontend_framework: FrontendFramework::default(),
            database: Database::default(),
            include_auth: true,
            auth_type: DEFAULT_AUTH_TYPE.to_string(),
            additional_features: Feature::defaults(),
            server_port: 8080,
            java_version: "17".to_string(),
            spring_boot_version: "3.2.0".to_string(),
            node_version: "20.10.0".to_string(),
            npm_version: "10.2.3".to_string(),
            advanced_config: None,
            extra: BTreeMap::new(),
        }
    }
}

impl ConfigModel {
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.additional_features.contains(&feature)
    }

    /// Package name as a relative directory path (`com/example/app`).
    pub fn package_path(&self) -> String {
        self.package_name.replace('.', "/")
    }
}

/// Validate a partial configuration into a [`ConfigModel`].
///
/// Never fails. Absent or invalid enum values fall back to their defaults,
/// unknown features are dropped, and an absent `additionalFeatures` yields
/// the default feature set while an explicit empty list stays empty. A
/// non-object input is treated as an empty object.
pub fn validate(partial: &Value) -> ConfigModel {
    let empty = Map::new();
    let fields = match partial {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            warn!("Configuration is not an object ({}), using defaults", kind_of(other));
            &empty
        }
    };

    let defaults = ConfigModel::default();

    let build_tool = enum_field(fields, "buildTool", BuildTool::parse).unwrap_or(defaults.build_tool);
    let frontend_framework = enum_field(fields, "frontendFramework", FrontendFramework::parse)
        .unwrap_or(defaults.frontend_framework);
    let database = enum_field(fields, "database", Database::parse).unwrap_or(defaults.database);

    let additional_features = match fields.get("additionalFeatures") {
        Some(Value::Array(items)) => filter_features(items),
        Some(Value::Null) | None => defaults.additional_features,
        Some(other) => {
            warn!(
                "additionalFeatures is not a list ({}), using defaults",
                kind_of(other)
            );
            defaults.additional_features
        }
    };

    let advanced_config = match fields.get("advancedConfig") {
        None | Some(Value::Null) => None,
        Some(tree) => match AdvancedConfig::from_overrides(tree) {
            Ok(advanced) => Some(advanced),
            Err(e) => {
                warn!("Dropping advanced configuration: {}", e);
                None
            }
        },
    };

    let extra = fields
        .iter()
        .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    ConfigModel {
        app_name: string_field(fields, "appName").unwrap_or(defaults.app_name),
        package_name: string_field(fields, "packageName").unwrap_or(defaults.package_name),
        build_tool,
        frontend_framework,
        database,
        include_auth: fields
            .get("includeAuth")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.include_auth),
        auth_type: string_field(fields, "authType").unwrap_or(defaults.auth_type),
        additional_features,
        server_port: port_field(fields, "serverPort").unwrap_or(defaults.server_port),
        java_version: version_field(fields, "javaVersion").unwrap_or(defaults.java_version),
        spring_boot_version: version_field(fields, "springBootVersion")
            .unwrap_or(defaults.spring_boot_version),
        node_version: version_field(fields, "nodeVersion").unwrap_or(defaults.node_version),
        npm_version: version_field(fields, "npmVersion").unwrap_or(defaults.npm_version),
        advanced_config,
        extra,
    }
}

/// Attach advanced options to a configuration.
///
/// The overrides are deep-merged onto the baseline [`AdvancedConfig`]; the
/// input configuration is left untouched and a new one is returned.
pub fn extend(config: &ConfigModel, overrides: &Value) -> ConfigResult<ConfigModel> {
    let advanced = AdvancedConfig::from_overrides(overrides)?;
    Ok(ConfigModel {
        advanced_config: Some(advanced),
        ..config.clone()
    })
}

fn enum_field<T>(fields: &Map<String, Value>, key: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    let value = fields.get(key)?;
    let parsed = value.as_str().and_then(parse);
    if parsed.is_none() {
        debug!("Invalid value for {}: {}, using default", key, value);
    }
    parsed
}

fn filter_features(items: &[Value]) -> Vec<Feature> {
    let mut features = Vec::new();
    for item in items {
        match item.as_str().and_then(Feature::parse) {
            Some(feature) if !features.contains(&feature) => features.push(feature),
            Some(_) => {}
            None => debug!("Dropping unknown feature: {}", item),
        }
    }
    features
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn version_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn port_field(fields: &Map<String, Value>, key: &str) -> Option<u16> {
    match fields.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
