//! Command-line interface definition for rigging.
//!
//! # Command Structure
//!
//! - `rigging plan` - Print the derived build jobs as JSON
//! - `rigging build` - Clear the output, derive the jobs and run them once
//! - `rigging dev` - Development build with watch mode

mod commands;
pub mod enums;

use clap::Parser;

pub use commands::{BuildArgs, Command, DevArgs, EnvArgs, PlanArgs};
pub use enums::*;

/// Rigging - build jobs for a component-app scaffold
#[derive(Parser, Debug)]
#[command(
    name = "rigging",
    version,
    about = "Derive and run the build jobs of a component-app scaffold",
    long_about = "Rigging reads the build environment and the mode environment file,\n\
                  derives the bundle (and optionally code-split) jobs, and runs them\n\
                  through the configured bundler, starting the dev server and the\n\
                  prerender job once their output is written."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
