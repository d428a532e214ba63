//! Error handling for the rigging CLI.
//!
//! Startup failures (missing environment file, output directory that cannot
//! be cleared, unconfigured bundler) abort before any job runs. Failures of
//! the external bundler are reported unchanged as [`BuildError::BackendFailed`].
//!
//! # Example
//!
//! ```rust,no_run
//! use rigging_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_template(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod report;

use std::path::PathBuf;
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment, env-file or layout errors from job derivation
    #[error("Configuration error: {0}")]
    Config(#[from] rigging_config::ConfigError),

    /// Errors while running a job
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while running a build job.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No bundler command in rigging.toml
    #[error("No bundler command configured\n\nHint: Add `[bundler] command = [\"node\", \"scripts/bundle.mjs\"]` to rigging.toml")]
    BackendNotConfigured,

    /// The bundler process could not be started
    #[error("Failed to start bundler '{program}': {source}\n\nHint: Check that the bundler command is installed and on PATH")]
    BackendSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The bundler exited unsuccessfully
    #[error("Bundler failed for job '{job}' ({status})")]
    BackendFailed { job: String, status: String },

    /// Copying a static asset failed
    #[error("Failed to copy {}: {source}\n\nHint: Check output directory permissions", .path.display())]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into `CliError::FileNotFound` for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }
}
