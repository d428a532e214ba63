//! Command implementations for the rigging CLI.
//!
//! - [`plan`] - Print the derived jobs
//! - [`build`] - One-shot production or development build
//! - [`dev`] - Build, then rebuild on change
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod build;
pub mod dev;
pub mod plan;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
pub use plan::execute as plan_execute;
