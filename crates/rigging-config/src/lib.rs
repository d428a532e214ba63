//! Build job derivation for rigging.
//!
//! Reads the build environment once, loads the mode environment file, and
//! produces the ordered list of [`BuildJobDescriptor`]s a bundler executes.
//! The write hooks that start the dev server and the prerender job live in
//! [`hooks`].

pub mod derive;
pub mod env_file;
pub mod environment;
pub mod error;
pub mod hooks;
pub mod html;
pub mod job;
pub mod layout;

// Re-export main types
pub use derive::{ConfigDeriver, clear_output_dir};
pub use env_file::{EnvVarTable, PROCESS_ENV_PREFIX, env_file_path};
pub use environment::*;
pub use error::*;
pub use hooks::{AuxCommand, HookKind, ProcessSpawner, ShellSpawner, SpawnLatch, WriteHooks};
pub use html::{HtmlTemplatingRule, SCRIPT_PLACEHOLDER};
pub use job::*;
pub use layout::{BundlerCommand, CONFIG_FILE, HookCommands, LayoutOptions, ProjectLayout};
