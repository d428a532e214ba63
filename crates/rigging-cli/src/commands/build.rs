//! `rigging build`: derive the jobs and run each of them once.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::driver::{BuildDriver, CommandBackend};
use crate::error::Result;
use crate::ui;
use rigging_config::{ConfigDeriver, WriteHooks};
use std::time::Instant;

/// Execute the build command.
///
/// The bundler command is checked before the output directory is cleared,
/// so a misconfigured project keeps its previous build.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start = Instant::now();
    let (layout, env) = utils::prepare(&args.env, false)?;

    let backend = CommandBackend::from_layout(&layout)?;

    ui::info(&format!(
        "Building {} ({}, {} mode)",
        layout.root.display(),
        if env.is_production { "production" } else { "development" },
        env.mode
    ));

    let jobs = ConfigDeriver::new(&layout, &env).derive()?;
    let mut driver = BuildDriver::new(Box::new(backend), WriteHooks::default());
    let reports = driver.run_all(&jobs).await?;

    ui::print_job_summary(&reports);
    ui::success(&format!(
        "Build completed in {}",
        ui::format_duration(start.elapsed())
    ));

    Ok(())
}
