//! Naming rules for user supplied identifiers.
//!
//! Validation of a [`ConfigModel`](crate::ConfigModel) passes names through
//! untouched; callers that collect names interactively check them here first.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ConfigError, ConfigResult};

fn package_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*$").unwrap())
}

fn class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][a-zA-Z0-9_]*$").unwrap())
}

fn app_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").unwrap())
}

/// Check a Java package name such as `com.example.app`.
pub fn validate_package_name(name: &str) -> ConfigResult<()> {
    if package_pattern().is_match(name) {
        return Ok(());
    }
    Err(ConfigError::InvalidName {
        kind: "package name",
        value: name.to_string(),
        message: "expected dot-separated lowercase segments (e.g. com.example.app)".to_string(),
    })
}

/// Check a Java class name such as `UserController`.
pub fn validate_class_name(name: &str) -> ConfigResult<()> {
    if class_pattern().is_match(name) {
        return Ok(());
    }
    Err(ConfigError::InvalidName {
        kind: "class name",
        value: name.to_string(),
        message: "must start with an uppercase letter and contain only letters, digits and underscores"
            .to_string(),
    })
}

/// Check an application name such as `my-shop`.
pub fn validate_app_name(name: &str) -> ConfigResult<()> {
    if app_pattern().is_match(name) {
        return Ok(());
    }
    Err(ConfigError::InvalidName {
        kind: "application name",
        value: name.to_string(),
        message: "must start with a lowercase letter and contain only lowercase letters, digits and dashes"
            .to_string(),
    })
}
