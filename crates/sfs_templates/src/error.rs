//! Error types for templates.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
///
/// `Render` points at the template (an authoring problem), `Write` at the
/// destination (an environment problem); callers rely on telling them apart.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template rendering failed for {template}: {message}")]
    Render { template: String, message: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Destination {} is produced by more than one template", .0.display())]
    DestinationCollision(PathBuf),

    #[error("Invalid destination path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TemplateError {
    pub(crate) fn render(template: impl Into<String>, err: impl std::fmt::Display) -> Self {
        TemplateError::Render {
            template: template.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        TemplateError::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return TemplateError::NotFound(path.to_path_buf());
        }
        TemplateError::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the error comes from the template itself rather than the
    /// filesystem.
    pub fn is_render_error(&self) -> bool {
        matches!(self, TemplateError::Render { .. })
    }
}
