//! Template rendering.

use std::fs;
use std::path::Path;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::context::TemplateContext;
use crate::error::{TemplateError, TemplateResult};
use crate::helpers;
use crate::paths::is_template;

/// Renders Jinja templates against a [`TemplateContext`].
///
/// Undefined variables are errors, trailing newlines are kept and nothing is
/// auto-escaped: the output is source code, templates call `escapeHtml`
/// explicitly where needed.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_: &str| AutoEscape::None);
        helpers::register(&mut env);
        Self { env }
    }

    /// Render template source. `name` identifies the template in errors.
    pub fn render(&self, name: &str, source: &str, context: &TemplateContext) -> TemplateResult<String> {
        self.env
            .render_named_str(name, source, context.to_value())
            .map_err(|e| TemplateError::render(name, e))
    }

    /// Render a template file.
    pub fn render_file(&self, template_path: &Path, context: &TemplateContext) -> TemplateResult<String> {
        let source =
            fs::read_to_string(template_path).map_err(|e| TemplateError::read(template_path, e))?;
        let name = template_path.to_string_lossy();
        self.render(&name, &source, context)
    }

    /// Render a template file and write the result, replacing any existing
    /// file. Parent directories are created as needed.
    pub fn render_to_file(
        &self,
        template_path: &Path,
        output_path: &Path,
        context: &TemplateContext,
    ) -> TemplateResult<()> {
        let rendered = self.render_file(template_path, context)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| TemplateError::write(parent, e))?;
        }
        fs::write(output_path, rendered).map_err(|e| TemplateError::write(output_path, e))?;
        debug!("Rendered: {:?}", output_path);
        Ok(())
    }

    /// Check template syntax without rendering.
    pub fn validate(&self, source: &str) -> bool {
        match self.env.template_from_str(source) {
            Ok(_) => true,
            Err(e) => {
                debug!("Template failed to compile: {}", e);
                false
            }
        }
    }

    /// Check the syntax of a template file. Unreadable files are invalid.
    pub fn validate_file(&self, template_path: &Path) -> bool {
        match fs::read_to_string(template_path) {
            Ok(source) => self.validate(&source),
            Err(e) => {
                warn!("Cannot read template {:?}: {}", template_path, e);
                false
            }
        }
    }

    /// Check every template file below `dir`, collecting all failures.
    pub fn validate_dir(&self, dir: &Path) -> TemplateResult<ValidationResult> {
        if !dir.is_dir() {
            return Err(TemplateError::NotFound(dir.to_path_buf()));
        }

        let mut result = ValidationResult::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    result.add_warning(format!("Skipped unreadable entry: {}", e));
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_template(&entry.file_name().to_string_lossy()) {
                continue;
            }

            result.checked += 1;
            let path = entry.path();
            let outcome = fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|source| {
                    self.env
                        .template_from_str(&source)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                });
            if let Err(message) = outcome {
                result.add_error(format!("{}: {}", path.display(), message));
            }
        }

        debug!(
            "Validated {} templates under {:?}: {} invalid",
            result.checked,
            dir,
            result.errors.len()
        );
        Ok(result)
    }
}

/// Outcome of validating a set of templates.
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    /// Number of templates inspected.
    pub checked: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            checked: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
        self.valid = false;
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sfs_config::validate;
    use tempfile::tempdir;

    fn context() -> TemplateContext {
        let config = validate(&json!({
            "appName": "my-app",
            "buildTool": "Gradle",
            "frontendFramework": "Angular",
            "additionalFeatures": ["docker"]
        }));
        TemplateContext::new(config).with_var("entityName", "order_item")
    }

    #[test]
    fn test_render_variables() {
        let renderer = TemplateRenderer::new();
        let rendered = renderer
            .render("inline", "App: {{ appName }}, Build: {{ buildTool }}", &context())
            .unwrap();
        assert_eq!(rendered, "App: my-app, Build: Gradle");
    }

    #[test]
    fn test_render_conditionals_and_loops() {
        let renderer = TemplateRenderer::new();
        let source = "{% if includeAuth %}secured{% endif %}|{% for f in additionalFeatures %}{{ f }};{% endfor %}";
        assert_eq!(renderer.render("inline", source, &context()).unwrap(), "secured|docker;");
    }

    #[test]
    fn test_helpers_in_scope() {
        let renderer = TemplateRenderer::new();
        let source = "{{ pascalCase(entityName) }} {{ entityName | camel_case }} {{ escapeHtml('<b>') }}";
        assert_eq!(
            renderer.render("inline", source, &context()).unwrap(),
            "OrderItem orderItem &lt;b&gt;"
        );
    }

    #[test]
    fn test_conditional_helpers() {
        let renderer = TemplateRenderer::new();
        let source = concat!(
            "{{ if_frontend('Angular', 'ng', 'other') }}|",
            "{{ if_build_tool('Maven', 'pom.xml', 'build.gradle') }}|",
            "{{ if_has_feature('docker', 'Dockerfile') }}|",
            "{{ if_has_feature('kafka', 'kafka') }}|",
            "{{ if_has_auth('auth', 'open') }}|",
            "{{ if_database(42, 'yes', 'no') }}|",
            "{{ if_frontend() }}|",
            "{{ config_value('advancedConfig.dockerOptions.baseImage', 'none') }}|",
            "{{ config_value('appName') }}"
        );
        assert_eq!(
            renderer.render("inline", source, &context()).unwrap(),
            "ng|build.gradle|Dockerfile||auth|no||none|my-app"
        );
    }

    #[test]
    fn test_no_auto_escaping() {
        let renderer = TemplateRenderer::new();
        let ctx = context().with_var("generic", "List<String>");
        assert_eq!(
            renderer.render("Entity.html", "{{ generic }}", &ctx).unwrap(),
            "List<String>"
        );
    }

    #[test]
    fn test_undefined_variable_is_render_error() {
        let renderer = TemplateRenderer::new();
        let err = renderer
            .render("Broken.java", "class {{ missingName }} {}", &context())
            .unwrap_err();
        match err {
            TemplateError::Render { template, .. } => assert_eq!(template, "Broken.java"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.validate("Hello {{ name }}"));
        assert!(renderer.validate("{% if a %}x{% endif %}"));
        assert!(!renderer.validate("{% if a %}x"));
        assert!(!renderer.validate("{{ name "));
    }

    #[test]
    fn test_render_to_file_creates_parents() {
        let temp = tempdir().unwrap();
        let template = temp.path().join("App.java.jinja");
        fs::write(&template, "package {{ packageName }};\n").unwrap();
        let output = temp.path().join("out/src/App.java");

        let renderer = TemplateRenderer::new();
        renderer.render_to_file(&template, &output, &context()).unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), "package com.example.app;\n");
    }

    #[test]
    fn test_render_missing_template_file() {
        let temp = tempdir().unwrap();
        let renderer = TemplateRenderer::new();
        let err = renderer
            .render_file(&temp.path().join("nope.jinja"), &context())
            .unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_validate_dir_collects_failures() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("good.txt.jinja"), "{{ a }}").unwrap();
        fs::write(temp.path().join("nested/bad.txt.jinja"), "{% for %}").unwrap();
        fs::write(temp.path().join("plain.txt"), "{% not a template").unwrap();

        let renderer = TemplateRenderer::new();
        let result = renderer.validate_dir(temp.path()).unwrap();
        assert!(!result.valid);
        assert_eq!(result.checked, 2);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("bad.txt.jinja"));
    }
}
