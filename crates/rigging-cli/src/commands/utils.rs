//! Shared helpers for command implementations.

use crate::cli::EnvArgs;
use crate::error::{Result, ResultExt};
use rigging_config::{BuildEnvironment, ProjectLayout};
use std::path::PathBuf;

/// Canonical project root: `--root` if given, else the current directory.
pub fn resolve_root(args: &EnvArgs) -> Result<PathBuf> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };

    root.canonicalize().with_path(&root)
}

/// Read the build environment once. Flags win over process variables.
pub fn resolve_environment(args: &EnvArgs, watch: bool) -> Result<BuildEnvironment> {
    let overrides = args.overrides(watch);
    let env = BuildEnvironment::from_lookup(|name| {
        overrides
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    })?;
    Ok(env)
}

/// Root, layout and environment for a command.
pub fn prepare(args: &EnvArgs, watch: bool) -> Result<(ProjectLayout, BuildEnvironment)> {
    let root = resolve_root(args)?;
    let layout = ProjectLayout::load(&root)?;
    let env = resolve_environment(args, watch)?;

    tracing::debug!(
        root = %layout.root.display(),
        production = env.is_production,
        bundling = %env.bundling,
        prerender = env.should_prerender,
        mode = %env.mode,
        "prepared build inputs"
    );
    Ok((layout, env))
}
