//! Loading partial configurations from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{validate, ConfigModel};

/// Read a raw (unvalidated) configuration tree from a JSON, YAML or TOML file.
pub fn read_partial(path: &Path) -> ConfigResult<Value> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    debug!("Reading configuration from {:?}", path);
    let content = fs::read_to_string(path)?;

    let tree: Value = match extension.as_str() {
        "json" => serde_json::from_str(&content)?,
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(tree)
}

/// Load and validate a configuration file.
///
/// Syntax and IO problems are errors; anomalies inside a well-formed file are
/// defaulted by [`validate`].
pub fn load_config(path: &Path) -> ConfigResult<ConfigModel> {
    let partial = read_partial(path)?;
    let config = validate(&partial);
    info!(
        "Loaded configuration for {} ({}, {}, {})",
        config.app_name, config.build_tool, config.frontend_framework, config.database
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BuildTool, Database, Feature};
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sfs.yaml");
        fs::write(
            &path,
            "appName: shop\nbuildTool: Gradle\nadditionalFeatures:\n  - redis\n  - nope\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.app_name, "shop");
        assert_eq!(config.build_tool, BuildTool::Gradle);
        assert_eq!(config.additional_features, vec![Feature::Redis]);
    }

    #[test]
    fn test_load_toml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sfs.toml");
        fs::write(&path, "appName = \"shop\"\ndatabase = \"MongoDB\"\nserverPort = 9000\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.database, Database::MongoDb);
        assert_eq!(config.server_port, 9000);
    }

    #[test]
    fn test_load_json() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sfs.json");
        fs::write(&path, r#"{"appName": "shop", "includeAuth": false}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert!(!config.include_auth);
        assert_eq!(config.auth_type, "JWT");
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sfs.ini");
        fs::write(&path, "appName=shop").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sfs.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let temp = tempdir().unwrap();
        let err = load_config(&temp.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
