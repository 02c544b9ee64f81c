//! Destination path derivation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Suffix marking a file that is rendered rather than copied.
pub const TEMPLATE_MARKER: &str = ".jinja";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"__([a-zA-Z0-9_]+?)__").unwrap())
}

/// Whether a file name carries the template marker.
pub fn is_template(name: &str) -> bool {
    name.len() > TEMPLATE_MARKER.len() && name.ends_with(TEMPLATE_MARKER)
}

/// Remove a trailing template marker; other names are returned unchanged.
pub fn strip_marker(name: &str) -> &str {
    if is_template(name) {
        &name[..name.len() - TEMPLATE_MARKER.len()]
    } else {
        name
    }
}

/// Replace `__key__` placeholders using `lookup`. Placeholders whose key
/// `lookup` does not know are left as written.
pub fn substitute_placeholders<F>(name: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    placeholder_regex()
        .replace_all(name, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Output file name of a template: marker stripped, placeholders replaced.
/// Unknown keys become "".
pub fn output_filename(template_path: &Path, vars: &serde_json::Map<String, serde_json::Value>) -> String {
    let name = template_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    substitute_placeholders(strip_marker(&name), |key| {
        Some(vars.get(key).map(value_to_segment).unwrap_or_default())
    })
}

/// String form of a variable used inside a path segment.
pub(crate) fn value_to_segment(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `com.example.app` → `com/example/app`
pub fn package_to_path(package_name: &str) -> PathBuf {
    package_name
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// `<output>/src/main/java/<package>/<Class>.java`
pub fn java_source_path(output_dir: &Path, package_name: &str, class_name: &str) -> PathBuf {
    output_dir
        .join("src/main/java")
        .join(package_to_path(package_name))
        .join(format!("{}.java", class_name))
}

/// `<output>/src/test/java/<package>/<Class>.java`
pub fn test_source_path(output_dir: &Path, package_name: &str, class_name: &str) -> PathBuf {
    output_dir
        .join("src/test/java")
        .join(package_to_path(package_name))
        .join(format!("{}.java", class_name))
}

/// `<output>/src/main/resources/<relative>`
pub fn resource_path(output_dir: &Path, relative: impl AsRef<Path>) -> PathBuf {
    output_dir.join("src/main/resources").join(relative)
}

/// Coarse category of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Java,
    Resource,
    Frontend,
    Config,
    Other,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Java => "java",
            FileKind::Resource => "resource",
            FileKind::Frontend => "frontend",
            FileKind::Config => "config",
            FileKind::Other => "other",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const FRONTEND_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".vue", ".html", ".css"];
const CONFIG_EXTENSIONS: &[&str] = &[".xml", ".json", ".conf"];

/// Categorise a path. Checks run in order: Java sources, resources (static
/// js/css excluded), frontend assets, build/config files.
pub fn identify_file_type(path: &Path) -> FileKind {
    // Leading slash so that relative paths match directory rules too.
    let normalized = format!("/{}", path.to_string_lossy().replace('\\', "/"));
    let ends_with_any = |exts: &[&str]| exts.iter().any(|ext| normalized.ends_with(ext));
    let static_asset =
        normalized.contains("/resources/static/js/") || normalized.contains("/resources/static/css/");

    if normalized.ends_with(".java") {
        FileKind::Java
    } else if (normalized.contains("/resources/") && !static_asset)
        || normalized.ends_with(".properties")
        || normalized.ends_with(".yml")
    {
        FileKind::Resource
    } else if normalized.contains("/frontend/") || static_asset || ends_with_any(FRONTEND_EXTENSIONS) {
        FileKind::Frontend
    } else if normalized.contains("/config/") || ends_with_any(CONFIG_EXTENSIONS) {
        FileKind::Config
    } else {
        FileKind::Other
    }
}
