//! Writing rendered content to disk under an overwrite policy.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use fs_extra::file::CopyOptions;
use sfs_config::ConfigModel;
use tracing::{debug, warn};

use crate::error::{TemplateError, TemplateResult};

/// What happened to a destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    SkippedExists,
    Overwritten,
}

impl WriteOutcome {
    /// Whether content landed on disk.
    pub fn is_materialized(&self) -> bool {
        matches!(self, WriteOutcome::Written | WriteOutcome::Overwritten)
    }
}

/// How an existing destination is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingFilePolicy {
    /// Keep the file and log a warning.
    #[default]
    WarnAndSkip,
    /// Keep the file quietly.
    Skip,
    Overwrite,
    /// Refuse with [`TemplateError::AlreadyExists`].
    Fail,
}

/// Post-render content transform, e.g. a formatter.
pub type ContentTransform = Arc<dyn Fn(&str, &ConfigModel) -> String + Send + Sync>;

/// Options for a single write.
#[derive(Clone, Default)]
pub struct WriteOptions {
    pub force: bool,
    pub skip_if_exists: bool,
    pub fail_if_exists: bool,
    pub transform: Option<ContentTransform>,
}

impl fmt::Debug for WriteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteOptions")
            .field("force", &self.force)
            .field("skip_if_exists", &self.skip_if_exists)
            .field("fail_if_exists", &self.fail_if_exists)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn skip_if_exists(mut self, skip: bool) -> Self {
        self.skip_if_exists = skip;
        self
    }

    pub fn fail_if_exists(mut self, fail: bool) -> Self {
        self.fail_if_exists = fail;
        self
    }

    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str, &ConfigModel) -> String + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Effective policy. `force` beats `skip_if_exists`, which beats
    /// `fail_if_exists`.
    pub fn policy(&self) -> ExistingFilePolicy {
        if self.force {
            ExistingFilePolicy::Overwrite
        } else if self.skip_if_exists {
            ExistingFilePolicy::Skip
        } else if self.fail_if_exists {
            ExistingFilePolicy::Fail
        } else {
            ExistingFilePolicy::WarnAndSkip
        }
    }
}

/// Writes files for one configuration.
#[derive(Debug, Clone)]
pub struct FileMaterializer {
    config: Arc<ConfigModel>,
}

/// Result of checking a destination before doing any work.
enum Precheck {
    Proceed { exists: bool },
    Skip,
}

impl FileMaterializer {
    pub fn new(config: impl Into<Arc<ConfigModel>>) -> Self {
        Self {
            config: config.into(),
        }
    }

    pub fn config(&self) -> &ConfigModel {
        &self.config
    }

    /// Apply the overwrite policy to `destination`.
    fn precheck(&self, destination: &Path, options: &WriteOptions) -> TemplateResult<Precheck> {
        if !destination.exists() {
            return Ok(Precheck::Proceed { exists: false });
        }

        match options.policy() {
            ExistingFilePolicy::Overwrite => Ok(Precheck::Proceed { exists: true }),
            ExistingFilePolicy::Skip => {
                debug!("Skipping existing file: {:?}", destination);
                Ok(Precheck::Skip)
            }
            ExistingFilePolicy::WarnAndSkip => {
                warn!(
                    "File already exists, not overwriting (use force to replace): {:?}",
                    destination
                );
                Ok(Precheck::Skip)
            }
            ExistingFilePolicy::Fail => Err(TemplateError::AlreadyExists(destination.to_path_buf())),
        }
    }

    /// Write `content` to `destination`, creating parent directories.
    ///
    /// The transform, if any, runs once on `content` right before the write.
    pub fn write(&self, destination: &Path, content: &str, options: &WriteOptions) -> TemplateResult<WriteOutcome> {
        match self.precheck(destination, options)? {
            Precheck::Skip => Ok(WriteOutcome::SkippedExists),
            Precheck::Proceed { exists } => self.put(destination, content, exists, options),
        }
    }

    /// Like [`write`](Self::write), but produces the content only once the
    /// policy allows the write. Skipped destinations are never rendered.
    pub fn write_with<F>(&self, destination: &Path, options: &WriteOptions, render: F) -> TemplateResult<WriteOutcome>
    where
        F: FnOnce() -> TemplateResult<String>,
    {
        match self.precheck(destination, options)? {
            Precheck::Skip => Ok(WriteOutcome::SkippedExists),
            Precheck::Proceed { exists } => {
                let content = render()?;
                self.put(destination, &content, exists, options)
            }
        }
    }

    fn put(&self, destination: &Path, content: &str, exists: bool, options: &WriteOptions) -> TemplateResult<WriteOutcome> {
        ensure_parent(destination)?;
        let result = match &options.transform {
            Some(transform) => fs::write(destination, transform(content, &self.config)),
            None => fs::write(destination, content),
        };
        result.map_err(|e| TemplateError::write(destination, e))?;

        Ok(finish(destination, exists))
    }

    /// Copy `source` byte for byte under the same policy. No transform.
    pub fn copy(&self, source: &Path, destination: &Path, options: &WriteOptions) -> TemplateResult<WriteOutcome> {
        if !source.is_file() {
            return Err(TemplateError::NotFound(source.to_path_buf()));
        }
        let exists = match self.precheck(destination, options)? {
            Precheck::Skip => return Ok(WriteOutcome::SkippedExists),
            Precheck::Proceed { exists } => exists,
        };

        ensure_parent(destination)?;
        let copy_options = CopyOptions {
            overwrite: true,
            ..CopyOptions::new()
        };
        fs_extra::file::copy(source, destination, &copy_options).map_err(|e| {
            TemplateError::write(destination, io::Error::new(io::ErrorKind::Other, e.to_string()))
        })?;

        Ok(finish(destination, exists))
    }
}

fn ensure_parent(destination: &Path) -> TemplateResult<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TemplateError::write(parent, e))?;
        }
    }
    Ok(())
}

fn finish(destination: &Path, existed: bool) -> WriteOutcome {
    if existed {
        debug!("Overwrote: {:?}", destination);
        WriteOutcome::Overwritten
    } else {
        debug!("Wrote: {:?}", destination);
        WriteOutcome::Written
    }
}

/// Whether writing `content` would change `path` (missing files always would).
pub fn should_update_file(path: &Path, content: &str) -> bool {
    match fs::read_to_string(path) {
        Ok(existing) => existing != content,
        Err(_) => true,
    }
}
