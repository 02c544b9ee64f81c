//! Recursive generation of a destination tree from a template directory.
//!
//! Every file below the template root is a leaf: names ending in
//! [`TEMPLATE_MARKER`](crate::paths::TEMPLATE_MARKER) are rendered, anything
//! else is copied verbatim. A failing leaf is recorded in the [`TreeReport`]
//! and the walk carries on with the next one.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::condition::{evaluate_condition, RenderCondition};
use crate::context::TemplateContext;
use crate::error::{TemplateError, TemplateResult};
use crate::materializer::{FileMaterializer, WriteOptions, WriteOutcome};
use crate::paths::{is_template, strip_marker, substitute_placeholders, value_to_segment};
use crate::renderer::TemplateRenderer;

const IGNORE_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Options for [`TreeGenerator::generate`].
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub write: WriteOptions,
    /// Globs over the `/`-separated path relative to the template root.
    /// A matching directory is pruned with its whole subtree.
    pub ignore: Vec<String>,
    /// Render file and directory names as templates too.
    pub process_destination_paths: bool,
    /// Generate nothing unless this holds for the context's configuration.
    pub condition: Option<RenderCondition>,
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_options(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.write.force = force;
        self
    }

    pub fn skip_if_exists(mut self, skip: bool) -> Self {
        self.write.skip_if_exists = skip;
        self
    }

    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    pub fn process_destination_paths(mut self, process: bool) -> Self {
        self.process_destination_paths = process;
        self
    }

    pub fn condition(mut self, condition: RenderCondition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// Result for one leaf of the template tree.
#[derive(Debug)]
pub struct LeafOutcome {
    pub source: PathBuf,
    /// Computed destination; the target directory itself when the
    /// destination could not be derived.
    pub destination: PathBuf,
    pub result: TemplateResult<WriteOutcome>,
}

/// Summary of a tree generation.
#[derive(Debug, Default)]
pub struct TreeReport {
    pub outcomes: Vec<LeafOutcome>,
    /// Set when the tree condition was false and nothing was attempted.
    pub skipped_by_condition: bool,
}

impl TreeReport {
    /// Number of files written or overwritten.
    pub fn count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|leaf| matches!(&leaf.result, Ok(outcome) if outcome.is_materialized()))
            .count()
    }

    /// Number of leaves left alone because the destination existed.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|leaf| matches!(leaf.result, Ok(WriteOutcome::SkippedExists)))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &LeafOutcome> {
        self.outcomes.iter().filter(|leaf| leaf.result.is_err())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    fn record(&mut self, source: &Path, destination: PathBuf, result: TemplateResult<WriteOutcome>) {
        if let Err(e) = &result {
            warn!("Failed to generate {:?}, continuing: {}", destination, e);
        }
        self.outcomes.push(LeafOutcome {
            source: source.to_path_buf(),
            destination,
            result,
        });
    }
}

/// Walks a template directory and materializes it under a destination root.
pub struct TreeGenerator<'a> {
    renderer: &'a TemplateRenderer,
    materializer: &'a FileMaterializer,
}

impl<'a> TreeGenerator<'a> {
    pub fn new(renderer: &'a TemplateRenderer, materializer: &'a FileMaterializer) -> Self {
        Self { renderer, materializer }
    }

    /// Generate `dest_dir` from the templates under `source_dir`.
    ///
    /// Only problems that stop the walk from starting are returned as `Err`;
    /// per-leaf failures end up in the report.
    pub fn generate(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        context: &TemplateContext,
        options: &TreeOptions,
    ) -> TemplateResult<TreeReport> {
        if let Some(condition) = &options.condition {
            if !evaluate_condition(condition, context.config()) {
                info!("Condition not met, skipping tree {:?}", source_dir);
                return Ok(TreeReport {
                    skipped_by_condition: true,
                    ..TreeReport::default()
                });
            }
        }

        if !source_dir.is_dir() {
            return Err(TemplateError::NotFound(source_dir.to_path_buf()));
        }
        fs::create_dir_all(dest_dir).map_err(|e| TemplateError::write(dest_dir, e))?;

        info!("Generating {:?} from templates in {:?}", dest_dir, source_dir);

        let ignore = compile_ignores(&options.ignore);
        let mut report = TreeReport::default();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        let walker = WalkDir::new(source_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry, source_dir, &ignore));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let source = e.path().map(Path::to_path_buf).unwrap_or_else(|| source_dir.to_path_buf());
                    report.record(&source, dest_dir.to_path_buf(), Err(TemplateError::Io(e.into())));
                    continue;
                }
            };

            let source = entry.path();
            let Ok(relative) = source.strip_prefix(source_dir) else {
                continue;
            };
            let is_dir = entry.file_type().is_dir();

            let destination = match self.destination_for(relative, dest_dir, is_dir, context, options) {
                Ok(destination) => destination,
                Err(e) => {
                    report.record(source, dest_dir.to_path_buf(), Err(e));
                    continue;
                }
            };

            if is_dir {
                if let Err(e) = fs::create_dir_all(&destination) {
                    report.record(source, destination.clone(), Err(TemplateError::write(&destination, e)));
                }
                continue;
            }

            if !claimed.insert(destination.clone()) {
                report.record(source, destination.clone(), Err(TemplateError::DestinationCollision(destination)));
                continue;
            }

            let result = if is_template(&entry.file_name().to_string_lossy()) {
                self.materializer.write_with(&destination, &options.write, || {
                    self.renderer.render_file(source, context)
                })
            } else {
                self.materializer.copy(source, &destination, &options.write)
            };
            if let Ok(outcome) = &result {
                debug!("{:?} -> {:?}: {:?}", relative, destination, outcome);
            }
            report.record(source, destination, result);
        }

        info!(
            "{} files generated, {} skipped, {} failed",
            report.count(),
            report.skipped(),
            report.failures().count()
        );
        Ok(report)
    }

    /// Destination of one entry: marker stripped from template file names,
    /// and every component rendered when paths are processed.
    fn destination_for(
        &self,
        relative: &Path,
        dest_dir: &Path,
        is_dir: bool,
        context: &TemplateContext,
        options: &TreeOptions,
    ) -> TemplateResult<PathBuf> {
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let last = segments.len().saturating_sub(1);

        let mut destination = dest_dir.to_path_buf();
        for (i, segment) in segments.iter().enumerate() {
            let name = if i == last && !is_dir {
                strip_marker(segment)
            } else {
                segment.as_str()
            };

            if options.process_destination_paths {
                let rendered = self.render_segment(name, context)?;
                push_rendered(&mut destination, segment, &rendered)?;
            } else {
                destination.push(name);
            }
        }
        Ok(destination)
    }

    fn render_segment(&self, segment: &str, context: &TemplateContext) -> TemplateResult<String> {
        let rendered = if segment.contains("{{") || segment.contains("{%") {
            self.renderer.render(segment, segment, context)?
        } else {
            segment.to_string()
        };
        Ok(substitute_placeholders(&rendered, |key| {
            context.lookup(key).as_ref().map(value_to_segment)
        }))
    }
}

/// Append a rendered name, which may expand to several directories
/// (`{{ packagePath }}` → `com/example/app`), refusing anything that would
/// leave the destination root.
fn push_rendered(destination: &mut PathBuf, original: &str, rendered: &str) -> TemplateResult<()> {
    let invalid = |reason: &str| TemplateError::InvalidPath {
        path: original.to_string(),
        reason: reason.to_string(),
    };

    let rendered_path = Path::new(rendered);
    if rendered_path.is_absolute() || rendered.starts_with('/') {
        return Err(invalid("renders to an absolute path"));
    }

    let mut pushed = false;
    for component in rendered_path.components() {
        match component {
            Component::Normal(part) => {
                destination.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            _ => return Err(invalid("renders outside the destination root")),
        }
    }

    if !pushed {
        return Err(invalid("renders to an empty name"));
    }
    Ok(())
}

fn compile_ignores(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|pattern| match Pattern::new(pattern) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                warn!("Ignoring invalid ignore pattern '{}': {}", pattern, e);
                None
            }
        })
        .collect()
}

fn is_ignored(entry: &DirEntry, root: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let Ok(relative) = entry.path().strip_prefix(root) else {
        return false;
    };
    if relative.as_os_str().is_empty() {
        return false;
    }

    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let ignored = patterns
        .iter()
        .any(|pattern| pattern.matches_with(&relative, IGNORE_MATCH));
    if ignored {
        debug!("Ignored: {}", relative);
    }
    ignored
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sfs_config::{validate, Feature};
    use tempfile::tempdir;

    use crate::condition::has_feature;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn context() -> TemplateContext {
        let config = validate(&json!({"appName": "demo", "additionalFeatures": []}));
        let package_path = config.package_path();
        TemplateContext::new(config)
            .with_var("packagePath", package_path)
            .with_var("entityName", "Order")
    }

    fn generate(src: &Path, dest: &Path, options: &TreeOptions) -> TreeReport {
        let ctx = context();
        let renderer = TemplateRenderer::new();
        let materializer = FileMaterializer::new(ctx.shared_config());
        TreeGenerator::new(&renderer, &materializer)
            .generate(src, dest, &ctx, options)
            .unwrap()
    }

    #[test]
    fn test_render_and_copy() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "README.md.jinja", "# {{ appName }}\n");
        write(src.path(), "static/logo.svg", "<svg>{{ not rendered }}</svg>");

        let report = generate(src.path(), dest.path(), &TreeOptions::new());
        assert_eq!(report.count(), 2);
        assert!(report.is_success());
        assert_eq!(fs::read_to_string(dest.path().join("README.md")).unwrap(), "# demo\n");
        assert_eq!(
            fs::read_to_string(dest.path().join("static/logo.svg")).unwrap(),
            "<svg>{{ not rendered }}</svg>"
        );
    }

    #[test]
    fn test_ignore_prunes_directories() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "keep.txt", "k");
        write(src.path(), "node_modules/pkg/index.js", "x");
        write(src.path(), "docs/notes.md", "n");
        write(src.path(), "docs/draft.tmp", "t");

        let options = TreeOptions::new().ignore("node_modules").ignore("*.tmp").ignore("[bad");
        let report = generate(src.path(), dest.path(), &options);
        assert_eq!(report.count(), 2);
        assert!(!dest.path().join("node_modules").exists());
        assert!(!dest.path().join("docs/draft.tmp").exists());
        assert!(dest.path().join("docs/notes.md").exists());
    }

    #[test]
    fn test_process_destination_paths() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(
            src.path(),
            "src/main/java/{{ packagePath }}/__entityName__Controller.java.jinja",
            "class {{ entityName }}Controller {}",
        );

        let report = generate(src.path(), dest.path(), &TreeOptions::new().process_destination_paths(true));
        assert_eq!(report.count(), 1);
        let out = dest.path().join("src/main/java/com/example/app/OrderController.java");
        assert_eq!(fs::read_to_string(out).unwrap(), "class OrderController {}");
    }

    #[test]
    fn test_dunder_names_survive_path_processing() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "frontend/__tests__/App.test.tsx", "test('app')");
        write(src.path(), "scripts/__init__.py", "");

        let report = generate(src.path(), dest.path(), &TreeOptions::new().process_destination_paths(true));
        assert!(report.is_success());
        assert_eq!(report.count(), 2);
        assert!(dest.path().join("frontend/__tests__/App.test.tsx").is_file());
        assert!(dest.path().join("scripts/__init__.py").is_file());
    }

    #[test]
    fn test_destination_escaping_root_is_rejected() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "{{ '..' }}/evil.txt", "x");
        write(src.path(), "fine.txt", "ok");

        let report = generate(src.path(), dest.path(), &TreeOptions::new().process_destination_paths(true));
        assert_eq!(report.count(), 1);
        let failure = report.failures().next().unwrap();
        assert!(matches!(failure.result, Err(TemplateError::InvalidPath { .. })));
    }

    #[test]
    fn test_collision_is_reported() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "app.yml", "plain");
        write(src.path(), "app.yml.jinja", "rendered");

        let report = generate(src.path(), dest.path(), &TreeOptions::new());
        assert_eq!(report.count(), 1);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].result, Err(TemplateError::DestinationCollision(_))));
        // sorted walk: the plain file comes first and wins
        assert_eq!(fs::read_to_string(dest.path().join("app.yml")).unwrap(), "plain");
    }

    #[test]
    fn test_render_failure_does_not_stop_walk() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "a.txt.jinja", "{{ undefinedThing }}");
        write(src.path(), "b.txt.jinja", "{{ appName }}");

        let report = generate(src.path(), dest.path(), &TreeOptions::new());
        assert_eq!(report.count(), 1);
        assert!(report.failures().all(|leaf| {
            matches!(&leaf.result, Err(e) if e.is_render_error())
        }));
        assert!(!dest.path().join("a.txt").exists());
        assert_eq!(fs::read_to_string(dest.path().join("b.txt")).unwrap(), "demo");
    }

    #[test]
    fn test_false_condition_generates_nothing() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "docker-compose.yml.jinja", "services:");

        let options = TreeOptions::new().condition(has_feature(Feature::Docker));
        let report = generate(src.path(), &dest.path().join("out"), &options);
        assert!(report.skipped_by_condition);
        assert_eq!(report.count(), 0);
        assert!(!dest.path().join("out").exists());
    }

    #[test]
    fn test_missing_source_root_is_error() {
        let dest = tempdir().unwrap();
        let ctx = context();
        let renderer = TemplateRenderer::new();
        let materializer = FileMaterializer::new(ctx.shared_config());
        let err = TreeGenerator::new(&renderer, &materializer)
            .generate(&dest.path().join("missing"), dest.path(), &ctx, &TreeOptions::new())
            .unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_empty_directories_are_created() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        fs::create_dir_all(src.path().join("src/test/resources")).unwrap();

        let report = generate(src.path(), dest.path(), &TreeOptions::new());
        assert_eq!(report.count(), 0);
        assert!(dest.path().join("src/test/resources").is_dir());
    }
}
