//! File system watcher with debouncing for watch mode.
//!
//! Watches the source and static directories and forwards relevant changes
//! over a channel. Output directories and hidden files are ignored so that a
//! rebuild never triggers itself.

use crate::error::Result;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Recursive watcher over several roots.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl FileWatcher {
    /// Start watching `roots`. Roots that do not exist are skipped with a
    /// warning; changes under any of `ignore` are dropped.
    ///
    /// Returns the watcher (keep it alive) and the receiving end of the
    /// change channel.
    pub fn new(
        roots: Vec<PathBuf>,
        ignore: Vec<PathBuf>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let (tx, rx) = mpsc::channel(100);

        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let watched = roots.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };

            for path in &event.paths {
                if should_ignore(path, &watched, &ignore) {
                    continue;
                }

                // Debounce: skip if same file changed within debounce window
                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // Receiver gone means the loop shut down
                let _ = tx.blocking_send(change);
            }
        })?;

        let mut active = Vec::new();
        for root in roots {
            if !root.is_dir() {
                tracing::warn!(dir = %root.display(), "not watching missing directory");
                continue;
            }
            watcher.watch(&root, RecursiveMode::Recursive)?;
            active.push(root);
        }

        Ok((
            Self {
                _watcher: watcher,
                roots: active,
            },
            rx,
        ))
    }

    /// Directories actually being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

fn should_ignore(path: &Path, roots: &[PathBuf], ignore: &[PathBuf]) -> bool {
    if ignore.iter().any(|dir| path.starts_with(dir)) {
        return true;
    }

    let Some(root) = roots.iter().find(|root| path.starts_with(root)) else {
        return true;
    };

    let Ok(rel_path) = path.strip_prefix(root) else {
        return true;
    };

    // Hidden files and directories (editor swap files, VCS metadata)
    rel_path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn roots() -> Vec<PathBuf> {
        vec![PathBuf::from("/project/src"), PathBuf::from("/project/static")]
    }

    #[test]
    fn test_should_ignore_output_dir() {
        let ignore = vec![PathBuf::from("/project/static/build")];
        assert!(should_ignore(Path::new("/project/static/build/bundle.js"), &roots(), &ignore));
        assert!(!should_ignore(Path::new("/project/static/index.css"), &roots(), &ignore));
    }

    #[test]
    fn test_should_ignore_hidden_files() {
        assert!(should_ignore(Path::new("/project/src/.App.svelte.swp"), &roots(), &[]));
        assert!(should_ignore(Path::new("/project/src/.cache/x.js"), &roots(), &[]));
        assert!(!should_ignore(Path::new("/project/src/pages/index.svelte"), &roots(), &[]));
    }

    #[test]
    fn test_should_ignore_outside_roots() {
        assert!(should_ignore(Path::new("/project/package.json"), &roots(), &[]));
    }

    #[test]
    fn test_file_change_path() {
        let path = PathBuf::from("/project/src/main.js");
        assert_eq!(FileChange::Modified(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Created(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Removed(path.clone()).path(), path.as_path());
    }

    #[tokio::test]
    async fn test_missing_roots_are_skipped() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir(&src).unwrap();

        let (watcher, _rx) =
            FileWatcher::new(vec![src.clone(), dir.path().join("static")], vec![], 50).unwrap();
        assert_eq!(watcher.roots(), &[src]);
    }
}
