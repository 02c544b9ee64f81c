//! Error types for configuration handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or extending a configuration.
///
/// Validation itself never fails: anomalies in a partial configuration are
/// replaced by defaults. These errors cover the edges around it (reading
/// files, typed advanced options, naming rules enforced by callers).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {kind} '{value}': {message}")]
    InvalidName {
        kind: &'static str,
        value: String,
        message: String,
    },

    #[error("Invalid advanced configuration: {0}")]
    InvalidAdvancedConfig(String),

    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
