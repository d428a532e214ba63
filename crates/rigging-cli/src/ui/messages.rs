//! One-line status messages on stderr.

use owo_colors::OwoColorize;

/// Kind of status line; picks the marker and its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Info,
    Error,
}

impl Status {
    fn marker(self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Info => "ℹ",
            Status::Error => "✗",
        }
    }
}

/// Render a status line, with ANSI colors only when `color` is set.
pub fn render(status: Status, message: &str, color: bool) -> String {
    let marker = status.marker();
    if !color {
        return format!("{marker} {message}");
    }

    match status {
        Status::Success => format!("{} {}", marker.green().bold(), message),
        Status::Info => format!("{} {}", marker.blue().bold(), message),
        Status::Error => format!("{} {}", marker.red().bold(), message.red()),
    }
}

fn emit(status: Status, message: &str) {
    eprintln!("{}", render(status, message, super::colors_enabled()));
}

pub fn success(message: &str) {
    emit(Status::Success, message);
}

/// ```no_run
/// use rigging_cli::ui::info;
///
/// info("Deriving build jobs...");
/// ```
pub fn info(message: &str) {
    emit(Status::Info, message);
}

pub fn error(message: &str) {
    emit(Status::Error, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_carry_no_escapes() {
        assert_eq!(render(Status::Success, "Build completed", false), "✓ Build completed");
        assert_eq!(render(Status::Error, "Build failed", false), "✗ Build failed");
    }

    #[test]
    fn colored_lines_keep_message() {
        let line = render(Status::Info, "Watching src", true);
        assert!(line.contains('\u{1b}'));
        assert!(line.contains("Watching src"));
    }
}
