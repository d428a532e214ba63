//! Miette diagnostic conversion for CLI errors.

use crate::error::{BuildError, CliError};
use miette::Report;
use rigging_config::ConfigError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Build(BuildError::BackendFailed { job, status }) => miette::miette!(
            help = "The bundler's own output above describes the failure",
            "Bundler failed for job '{}' ({})",
            job,
            status
        ),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::EnvFileNotFound(path) => miette::miette!(
            help = "Create the file (it may be empty) or set NODE_ENV to a mode that has one",
            "Environment file not found: {}",
            path.display()
        ),
        ConfigError::ClearOutput { path, source } => miette::miette!(
            help = "Check permissions on the output directory",
            "Failed to clear {}: {}",
            path.display(),
            source
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}
