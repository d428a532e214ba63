//! `rigging dev`: development build with rebuilds on change.
//!
//! The jobs are derived once with the watch signal set. Every change under
//! the source or static directory re-runs all jobs through the same driver,
//! so the dev server and the prerender job start at most once per session.

use crate::cli::DevArgs;
use crate::commands::utils;
use crate::dev::{FileChange, FileWatcher};
use crate::driver::{BuildDriver, CommandBackend};
use crate::error::Result;
use crate::ui;
use rigging_config::{BuildJobDescriptor, ConfigDeriver, WriteHooks};
use std::time::Instant;
use tokio::signal;

/// Execute the dev command.
///
/// A failed round is reported and the session keeps watching; only setup
/// errors (configuration, environment file, watcher) end the command.
pub async fn execute(args: DevArgs) -> Result<()> {
    let (layout, env) = utils::prepare(&args.env, true)?;
    let backend = CommandBackend::from_layout(&layout)?;

    let jobs = ConfigDeriver::new(&layout, &env).derive()?;
    let mut driver = BuildDriver::new(Box::new(backend), WriteHooks::default());

    ui::info("Performing initial build...");
    run_round(&mut driver, &jobs).await;

    let (watcher, mut change_rx) = FileWatcher::new(
        vec![layout.source_dir(), layout.static_dir()],
        vec![layout.dist_dir()],
        args.debounce_ms,
    )?;

    for root in watcher.roots() {
        ui::info(&format!("Watching for changes in: {}", root.display()));
    }
    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(change) = change_rx.recv() => {
                report_change(&change);

                // Collapse a burst of events into one rebuild
                while let Ok(extra) = change_rx.try_recv() {
                    tracing::debug!(path = %extra.path().display(), "coalesced change");
                }

                run_round(&mut driver, &jobs).await;
            }

            _ = signal::ctrl_c() => {
                ui::info("Stopping watch mode...");
                break;
            }
        }
    }

    ui::success("Watch mode stopped");
    Ok(())
}

async fn run_round(driver: &mut BuildDriver, jobs: &[BuildJobDescriptor]) {
    let start = Instant::now();
    match driver.run_all(jobs).await {
        Ok(reports) => {
            for report in reports.iter().filter(|r| !r.hooks_started.is_empty()) {
                tracing::info!(job = %report.name, hooks = ?report.hooks_started, "started hooks");
            }
            ui::success(&format!(
                "Rebuilt {} job(s) in {}",
                reports.len(),
                ui::format_duration(start.elapsed())
            ));
        }
        Err(e) => ui::error(&format!("Build failed: {}", e)),
    }
}

fn report_change(change: &FileChange) {
    let verb = match change {
        FileChange::Modified(_) => "changed",
        FileChange::Created(_) => "created",
        FileChange::Removed(_) => "removed",
    };
    ui::info(&format!("File {}: {}", verb, change.path().display()));
}
