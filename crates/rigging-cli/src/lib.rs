//! Command-line interface for rigging.
//!
//! The configuration crate derives the build jobs; this crate runs them:
//!
//! - [`cli`] - Argument parsing
//! - [`commands`] - `plan`, `build` and `dev`
//! - [`driver`] - Static copy, bundler invocation and write hooks per job
//! - [`dev`] - File watching for `rigging dev`
//! - [`error`] - Error types and miette reporting
//! - [`logger`] - `tracing` setup
//! - [`ui`] - Terminal messages
//!
//! ```rust,no_run
//! use rigging_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod dev;
pub mod driver;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, Result, ResultExt};
