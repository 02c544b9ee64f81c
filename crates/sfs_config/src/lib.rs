//! # sfs_config
//!
//! Project configuration for Spring-Fullstack-Speed.
//!
//! A raw, possibly malformed configuration tree (collected by prompts, a CLI
//! or a config file) is turned into a canonical [`ConfigModel`] by
//! [`validate`]. Validation never fails: every invalid or missing choice falls
//! back to a documented default. [`extend`] layers the nested
//! [`AdvancedConfig`] options on top.
//!
//! ## Example
//!
//! ```rust
//! use sfs_config::{validate, extend, BuildTool, Feature};
//! use serde_json::json;
//!
//! let config = validate(&json!({
//!     "appName": "shop",
//!     "buildTool": "invalid",
//!     "additionalFeatures": ["bogus", "docker"]
//! }));
//! assert_eq!(config.build_tool, BuildTool::Maven);
//! assert_eq!(config.additional_features, vec![Feature::Docker]);
//!
//! let config = extend(&config, &json!({"dockerOptions": {"exposePort": 3000}})).unwrap();
//! assert_eq!(config.advanced_config.unwrap().docker_options.expose_port, 3000);
//! ```

pub mod advanced;
pub mod error;
pub mod loader;
pub mod model;
pub mod naming;
pub mod options;

pub use advanced::{
    deep_merge, AdvancedConfig, CacheOptions, CacheType, DockerOptions, GeneratorOptions,
    JpaOptions, Packaging, PackagingOptions, SecurityOptions, TestOptions,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, read_partial};
pub use model::{extend, validate, ConfigModel, DEFAULT_AUTH_TYPE};
pub use naming::{validate_app_name, validate_class_name, validate_package_name};
pub use options::{BuildTool, Database, Feature, FrontendFramework};
