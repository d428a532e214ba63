//! Formatting utilities for durations and job summaries.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::driver::JobReport;

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use rigging_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print one line per finished job to stderr.
pub fn print_job_summary(reports: &[JobReport]) {
    let width = (Term::stderr().size().1 as usize).min(80);

    if super::colors_enabled() {
        eprintln!("\n{}", "Jobs".bold().underline());
    } else {
        eprintln!("\nJobs");
    }
    eprintln!("{}", "─".repeat(width));

    for report in reports {
        let hooks = if report.hooks_started.is_empty() {
            String::new()
        } else {
            let names: Vec<_> = report
                .hooks_started
                .iter()
                .map(|h| format!("{:?}", h).to_lowercase())
                .collect();
            format!(" started {}", names.join(", "))
        };

        let line = format!(
            "  {} {} {}{} {}",
            "▸".blue(),
            report.name.bright_white().bold(),
            format!("{} assets", report.copied_assets).dimmed(),
            hooks,
            format!("({})", format_duration(report.duration)).dimmed()
        );
        if super::colors_enabled() {
            eprintln!("{line}");
        } else {
            eprintln!("{}", console::strip_ansi_codes(&line));
        }
    }

    eprintln!("{}", "─".repeat(width));
}
