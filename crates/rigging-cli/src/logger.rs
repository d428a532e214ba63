//! Logging setup for the rigging CLI.
//!
//! Structured logging through `tracing`. Verbosity comes from the global
//! `--verbose`/`--quiet` flags, falling back to `RUST_LOG`.
//!
//! ```rust,no_run
//! use rigging_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("deriving jobs");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "rigging=debug,rigging_config=debug,rigging_cli=debug";
const QUIET_FILTER: &str = "rigging=error,rigging_config=error,rigging_cli=error";
const DEFAULT_FILTER: &str = "rigging=info,rigging_config=info,rigging_cli=info";

/// Build the filter for the given flags.
///
/// Order: `--verbose` (debug), `--quiet` (errors only), `RUST_LOG`, then
/// info for the rigging crates.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so these
    // only exercise filter construction.

    #[test]
    fn test_env_filter_verbose() {
        let filter = filter_for(true, false);
        assert!(filter.to_string().contains("rigging_config=debug"));
    }

    #[test]
    fn test_env_filter_quiet() {
        let filter = filter_for(false, true);
        assert!(filter.to_string().contains("rigging_cli=error"));
    }

    #[test]
    fn test_verbose_wins_over_quiet() {
        let filter = filter_for(true, true);
        assert!(filter.to_string().contains("debug"));
    }
}
