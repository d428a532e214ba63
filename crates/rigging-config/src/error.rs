//! Error types for environment loading and job derivation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Startup errors: these abort before any job runs
    #[error("environment file not found: {}", .0.display())]
    EnvFileNotFound(PathBuf),

    #[error("failed to clear output directory {}: {source}", .path.display())]
    ClearOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value for {field}: {value:?} ({hint})")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    // Project layout loading (rigging.toml / RIGGING_* variables)
    #[error("invalid project layout: {0}")]
    Layout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Layout(err.to_string())
    }
}
