use clap::{Args, Subcommand};
use rigging_config::{BUNDLING_VAR, BundlingStrategy, MODE_VAR, PRERENDER_VAR, WATCH_VAR};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::cli::enums::Bundling;

/// Available rigging subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the derived build jobs as JSON
    ///
    /// Reads the environment file but never touches the output directory.
    Plan(PlanArgs),

    /// Clear the output directory, derive the jobs and run each once
    Build(BuildArgs),

    /// Development build: run the jobs, then rebuild on every change
    ///
    /// Sets the watch signal, so the jobs are derived in development mode.
    /// The dev server and the prerender job start at most once.
    Dev(DevArgs),
}

/// Inputs shared by every command. Flags take precedence over the process
/// environment.
#[derive(Args, Debug, Clone, Default)]
pub struct EnvArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Mode name; selects `.env.<MODE>` (overrides NODE_ENV)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Bundling strategy (overrides BUNDLING)
    #[arg(long, value_enum)]
    pub bundling: Option<Bundling>,

    /// Prerender static pages after the last job (overrides PRERENDER)
    #[arg(long, value_name = "BOOL")]
    pub prerender: Option<bool>,
}

impl EnvArgs {
    /// Variables set by flags, layered over the process environment.
    pub fn overrides(&self, watch: bool) -> HashMap<String, String> {
        let mut vars = HashMap::new();

        if watch {
            vars.insert(WATCH_VAR.to_string(), "true".to_string());
        }
        if let Some(mode) = &self.mode {
            vars.insert(MODE_VAR.to_string(), mode.clone());
        }
        if let Some(bundling) = self.bundling {
            let strategy: BundlingStrategy = bundling.into();
            vars.insert(BUNDLING_VAR.to_string(), strategy.as_str().to_string());
        }
        if let Some(prerender) = self.prerender {
            vars.insert(PRERENDER_VAR.to_string(), prerender.to_string());
        }

        vars
    }
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub env: EnvArgs,

    /// Emit one job per line instead of pretty-printed JSON
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub env: EnvArgs,
}

/// Arguments for the dev command
#[derive(Args, Debug)]
pub struct DevArgs {
    #[command(flatten)]
    pub env: EnvArgs,

    /// Ignore repeated changes to the same file within this window
    #[arg(long, default_value_t = 100, value_name = "MS")]
    pub debounce_ms: u64,
}
