//! Entry point for sub-generators.
//!
//! A [`Generator`] binds one validated configuration to a renderer and a
//! materializer, and offers the single-file and tree operations that
//! project-, entity- and feature-level generators are built from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sfs_config::ConfigModel;
use tracing::info;

use crate::condition::{evaluate_condition, RenderCondition};
use crate::context::TemplateContext;
use crate::error::TemplateResult;
use crate::materializer::{FileMaterializer, WriteOptions};
use crate::paths::{java_source_path, resource_path};
use crate::renderer::TemplateRenderer;
use crate::tree::{TreeGenerator, TreeOptions, TreeReport};

/// Options for a single generated file.
#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    pub write: WriteOptions,
    /// Render the destination path as a template before writing.
    pub process_destination_path: bool,
    /// Skip the file unless this holds for the configuration.
    pub condition: Option<RenderCondition>,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force(mut self, force: bool) -> Self {
        self.write.force = force;
        self
    }

    pub fn skip_if_exists(mut self, skip: bool) -> Self {
        self.write.skip_if_exists = skip;
        self
    }

    pub fn write_options(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }

    pub fn process_destination_path(mut self, process: bool) -> Self {
        self.process_destination_path = process;
        self
    }

    pub fn condition(mut self, condition: RenderCondition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// Generation facade for one configuration.
pub struct Generator {
    config: Arc<ConfigModel>,
    renderer: TemplateRenderer,
    materializer: FileMaterializer,
}

impl Generator {
    pub fn new(config: impl Into<Arc<ConfigModel>>) -> Self {
        let config = config.into();
        Self {
            materializer: FileMaterializer::new(Arc::clone(&config)),
            renderer: TemplateRenderer::new(),
            config,
        }
    }

    pub fn config(&self) -> &ConfigModel {
        &self.config
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    pub fn materializer(&self) -> &FileMaterializer {
        &self.materializer
    }

    /// Fresh context for this configuration, with `packagePath` predefined.
    pub fn context(&self) -> TemplateContext {
        TemplateContext::new(Arc::clone(&self.config)).with_var("packagePath", self.config.package_path())
    }

    /// Render `template` into `destination`.
    ///
    /// Returns `true` when the file was written. An existing destination is
    /// an error unless `force` or `skip_if_exists` is set; with
    /// `skip_if_exists` it yields `false`.
    pub fn generate_file(
        &self,
        template: &Path,
        destination: &Path,
        context: &TemplateContext,
        options: &FileOptions,
    ) -> TemplateResult<bool> {
        if let Some(condition) = &options.condition {
            if !evaluate_condition(condition, &self.config) {
                info!("Condition not met, skipping {:?}", destination);
                return Ok(false);
            }
        }

        let destination = if options.process_destination_path {
            let raw = destination.to_string_lossy();
            PathBuf::from(self.renderer.render(&raw, &raw, context)?)
        } else {
            destination.to_path_buf()
        };

        let mut write = options.write.clone();
        if !write.force && !write.skip_if_exists {
            write.fail_if_exists = true;
        }

        let outcome = self
            .materializer
            .write_with(&destination, &write, || self.renderer.render_file(template, context))?;
        if outcome.is_materialized() {
            info!("Generated {:?}", destination);
        }
        Ok(outcome.is_materialized())
    }

    /// Generate `<output>/src/main/java/<package>/<class>.java`, with
    /// `className` and `packageName` added to the context.
    pub fn generate_java_source(
        &self,
        template: &Path,
        class_name: &str,
        package_name: &str,
        output_dir: &Path,
        vars: BTreeMap<String, serde_json::Value>,
        options: &FileOptions,
    ) -> TemplateResult<PathBuf> {
        let destination = java_source_path(output_dir, package_name, class_name);
        let context = self
            .context()
            .with_vars(vars)
            .with_var("className", class_name)
            .with_var("packageName", package_name);
        self.generate_file(template, &destination, &context, options)?;
        Ok(destination)
    }

    /// Generate `<output>/src/main/resources/<resource>`.
    pub fn generate_resource(
        &self,
        template: &Path,
        resource: &str,
        output_dir: &Path,
        vars: BTreeMap<String, serde_json::Value>,
        options: &FileOptions,
    ) -> TemplateResult<PathBuf> {
        let destination = resource_path(output_dir, resource);
        let context = self.context().with_vars(vars);
        self.generate_file(template, &destination, &context, options)?;
        Ok(destination)
    }

    pub fn generate_tree(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        context: &TemplateContext,
        options: &TreeOptions,
    ) -> TemplateResult<TreeReport> {
        TreeGenerator::new(&self.renderer, &self.materializer).generate(source_dir, dest_dir, context, options)
    }
}
