//! Watch-mode support for `rigging dev`.

pub mod watcher;

pub use watcher::{FileChange, FileWatcher};
