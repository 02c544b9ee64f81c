//! # sfs_templates
//!
//! Conditional template rendering and file-tree generation for
//! Spring-Fullstack-Speed.
//!
//! This crate turns a validated [`ConfigModel`](sfs_config::ConfigModel) and a
//! directory of Jinja templates into a project tree:
//!
//! - [`RenderCondition`] predicates gate files, trees and template blocks
//! - [`TemplateRenderer`] renders with a fixed helper surface
//! - [`FileMaterializer`] writes under a force / skip / fail policy
//! - [`TreeGenerator`] walks a template directory, collecting per-file results
//!
//! ## Example
//!
//! ```rust,no_run
//! use sfs_config::{validate, Feature};
//! use sfs_templates::{has_feature, Generator, TreeOptions};
//! use serde_json::json;
//! use std::path::Path;
//!
//! let config = validate(&json!({"appName": "shop", "additionalFeatures": ["docker"]}));
//! let generator = Generator::new(config);
//!
//! let options = TreeOptions::new()
//!     .ignore("*.md")
//!     .process_destination_paths(true)
//!     .condition(has_feature(Feature::Docker));
//! let report = generator
//!     .generate_tree(Path::new("templates/docker"), Path::new("./shop"), &generator.context(), &options)
//!     .unwrap();
//! println!("{} files generated", report.count());
//! ```

pub mod condition;
pub mod context;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod materializer;
pub mod paths;
pub mod renderer;
pub mod tree;

pub use condition::{
    and, evaluate_condition, has_auth, has_feature, is_build_tool, is_database, is_frontend, not,
    or, RenderCondition,
};
pub use context::{add_conditional_helpers, TemplateContext};
pub use error::{TemplateError, TemplateResult};
pub use generator::{FileOptions, Generator};
pub use materializer::{
    should_update_file, ContentTransform, ExistingFilePolicy, FileMaterializer, WriteOptions,
    WriteOutcome,
};
pub use paths::{identify_file_type, FileKind, TEMPLATE_MARKER};
pub use renderer::{TemplateRenderer, ValidationResult};
pub use tree::{LeafOutcome, TreeGenerator, TreeOptions, TreeReport};
