//! Advanced configuration layered on top of a validated project config.
//!
//! The advanced options are nested namespaces (packaging, persistence,
//! security, caching, testing, containerization, generator behaviour). Callers
//! supply a partial JSON tree which is deep-merged onto the baseline; only the
//! leaves they mention change.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Archive format of the generated application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    #[default]
    Jar,
    War,
}

/// Cache provider wired into the generated application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    #[default]
    Caffeine,
    Redis,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PackagingOptions {
    pub format: Packaging,
}

/// JPA / persistence defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct JpaOptions {
    pub show_sql: bool,
    pub format_sql: bool,
    pub ddl_auto: String,
}

impl Default for JpaOptions {
    fn default() -> Self {
        Self {
            show_sql: true,
            format_sql: true,
            ddl_auto: "update".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityOptions {
    pub jwt_expiration_ms: u64,
    pub remember_me_expiration_ms: u64,
    pub password_encoder: String,
    pub allow_registration: bool,
}

impl Default for SecurityOptions {
    fn default() -> Self {
        Self {
            // 24 hours
            jwt_expiration_ms: 86_400_000,
            // 30 days
            remember_me_expiration_ms: 2_592_000_000,
            password_encoder: "bcrypt".to_string(),
            allow_registration: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheOptions {
    #[serde(rename = "type")]
    pub cache_type: CacheType,
    pub time_to_live_seconds: u64,
    pub maximum_size: u64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            cache_type: CacheType::Caffeine,
            time_to_live_seconds: 3600,
            maximum_size: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TestOptions {
    #[serde(rename = "useJUnit5")]
    pub use_junit5: bool,
    pub use_mockito: bool,
    pub use_testcontainers: bool,
    pub use_cucumber: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            use_junit5: true,
            use_mockito: true,
            use_testcontainers: false,
            use_cucumber: false,
        }
    }
}

/// Container image defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DockerOptions {
    pub base_image: String,
    pub expose_port: u16,
}

impl Default for DockerOptions {
    fn default() -> Self {
        Self {
            base_image: "eclipse-temurin:17-jre-focal".to_string(),
            expose_port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    pub overwrite_files: bool,
    pub create_git_repository: bool,
    pub install_dependencies: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            overwrite_files: false,
            create_git_repository: true,
            install_dependencies: true,
        }
    }
}

/// Nested advanced options. `Default` is the fixed baseline every override
/// tree is merged onto.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedConfig {
    pub packaging: PackagingOptions,
    pub jpa_options: JpaOptions,
    pub security_options: SecurityOptions,
    pub cache_options: CacheOptions,
    pub test_options: TestOptions,
    pub docker_options: DockerOptions,
    pub generator_options: GeneratorOptions,
}

impl AdvancedConfig {
    /// Merge a partial override tree onto the baseline.
    ///
    /// `null` means "no overrides". Keys the baseline does not know are
    /// dropped; a leaf whose type does not fit the typed option is an error.
    pub fn from_overrides(overrides: &Value) -> ConfigResult<Self> {
        let mut tree = serde_json::to_value(Self::default())?;
        if !overrides.is_null() {
            deep_merge(&mut tree, overrides);
        }
        debug!("Merged advanced configuration overrides");
        serde_json::from_value(tree).map_err(|e| ConfigError::InvalidAdvancedConfig(e.to_string()))
    }
}

/// Recursively merge `source` into `target`.
///
/// When both sides hold an object at the same key the objects are merged key
/// by key; in every other case the source value replaces the target value.
pub fn deep_merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                let nested = matches!(
                    (target.get(key), value),
                    (Some(Value::Object(_)), Value::Object(_))
                );
                if nested {
                    if let Some(existing) = target.get_mut(key) {
                        deep_merge(existing, value);
                    }
                } else {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_keeps_sibling_keys() {
        let mut target = json!({"a": {"x": 1, "y": 2}, "b": true});
        deep_merge(&mut target, &json!({"a": {"y": 3}}));
        assert_eq!(target, json!({"a": {"x": 1, "y": 3}, "b": true}));
    }

    #[test]
    fn test_deep_merge_replaces_non_objects() {
        let mut target = json!({"a": {"x": 1}, "list": [1, 2]});
        deep_merge(&mut target, &json!({"a": 5, "list": [3]}));
        assert_eq!(target, json!({"a": 5, "list": [3]}));
    }

    #[test]
    fn test_deep_merge_adds_new_keys() {
        let mut target = json!({"a": 1});
        deep_merge(&mut target, &json!({"b": {"c": 2}}));
        assert_eq!(target, json!({"a": 1, "b": {"c": 2}}));
    }

    #[test]
    fn test_baseline_values() {
        let advanced = AdvancedConfig::default();
        assert_eq!(advanced.packaging.format, Packaging::Jar);
        assert_eq!(advanced.security_options.jwt_expiration_ms, 86_400_000);
        assert_eq!(advanced.cache_options.cache_type, CacheType::Caffeine);
        assert!(advanced.test_options.use_junit5);
        assert!(!advanced.generator_options.overwrite_files);
    }

    #[test]
    fn test_from_overrides_changes_only_named_leaves() {
        let advanced = AdvancedConfig::from_overrides(&json!({
            "dockerOptions": {"baseImage": "custom-image", "exposePort": 3000},
            "testOptions": {"useTestcontainers": true},
            "unknownNamespace": {"ignored": true}
        }))
        .unwrap();

        assert_eq!(advanced.docker_options.base_image, "custom-image");
        assert_eq!(advanced.docker_options.expose_port, 3000);
        assert!(advanced.test_options.use_testcontainers);
        assert!(advanced.test_options.use_junit5);
        assert_eq!(advanced.jpa_options, JpaOptions::default());
    }

    #[test]
    fn test_from_overrides_rejects_mistyped_leaf() {
        let err = AdvancedConfig::from_overrides(&json!({
            "dockerOptions": {"exposePort": "not-a-port"}
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAdvancedConfig(_)));
    }

    #[test]
    fn test_serialized_keys_match_template_names() {
        let tree = serde_json::to_value(AdvancedConfig::default()).unwrap();
        assert_eq!(tree["cacheOptions"]["type"], "caffeine");
        assert_eq!(tree["testOptions"]["useJUnit5"], true);
        assert_eq!(tree["packaging"]["format"], "jar");
    }
}
