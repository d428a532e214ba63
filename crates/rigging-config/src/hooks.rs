//! Write-completion hooks: auxiliary processes started after a job writes
//! its output.
//!
//! A watch loop reports a successful write after every rebuild. The dev
//! server and the prerender job must still start only once, so each hook
//! sits behind a [`SpawnLatch`]. Latches belong to a [`WriteHooks`] value
//! owned by the build driver; two drivers in one process each spawn once.

use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::job::{BuildJobDescriptor, PluginStep};

/// One-shot flag with atomic check-and-set.
#[derive(Debug, Default)]
pub struct SpawnLatch {
    started: AtomicBool,
}

impl SpawnLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for exactly one caller over the latch's lifetime.
    pub fn try_acquire(&self) -> bool {
        self.started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_set(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}

/// Which auxiliary process a hook starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Serve,
    Prerender,
}

/// A shell command line to start detached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxCommand {
    pub kind: HookKind,
    pub command_line: String,
}

/// Starts auxiliary processes.
pub trait ProcessSpawner: Send + Sync {
    fn spawn(&self, command: &AuxCommand) -> io::Result<()>;
}

/// Runs the command through the platform shell with stdin closed and
/// stdout/stderr inherited. The build never waits for it; a background
/// thread reaps it when it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellSpawner;

impl ProcessSpawner for ShellSpawner {
    fn spawn(&self, command: &AuxCommand) -> io::Result<()> {
        let mut cmd = shell_command(&command.command_line);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        start_reaped(cmd, command.kind)?;
        Ok(())
    }
}

/// Spawn `cmd` and hand the child to a waiter thread, so an exited process
/// does not linger as a zombie. The handle yields the exit status.
fn start_reaped(mut cmd: Command, kind: HookKind) -> io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = cmd.spawn()?;
    let pid = child.id();
    tracing::info!(pid, "started {:?} process", kind);

    thread::Builder::new()
        .name(format!("rigging-{kind:?}-{pid}").to_lowercase())
        .spawn(move || match child.wait() {
            Ok(status) => {
                tracing::info!(pid, %status, "{:?} process exited", kind);
                Some(status)
            }
            Err(err) => {
                tracing::warn!(pid, "failed to wait for {:?} process: {err}", kind);
                None
            }
        })
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

/// Hook state for one build driver.
pub struct WriteHooks {
    serve: SpawnLatch,
    prerender: SpawnLatch,
    spawner: Box<dyn ProcessSpawner>,
}

impl WriteHooks {
    pub fn new(spawner: Box<dyn ProcessSpawner>) -> Self {
        Self {
            serve: SpawnLatch::new(),
            prerender: SpawnLatch::new(),
            spawner,
        }
    }

    fn latch(&self, kind: HookKind) -> &SpawnLatch {
        match kind {
            HookKind::Serve => &self.serve,
            HookKind::Prerender => &self.prerender,
        }
    }

    /// Called after `job` wrote its output. Starts each hook the job carries
    /// unless that hook already started; returns the hooks started now.
    ///
    /// A failed spawn is logged, not propagated: the build itself succeeded.
    pub fn on_write_bundle(&self, job: &BuildJobDescriptor) -> Vec<HookKind> {
        let mut started = Vec::new();

        for step in &job.plugins {
            let command = match step {
                PluginStep::Serve { command } => AuxCommand {
                    kind: HookKind::Serve,
                    command_line: command.clone(),
                },
                PluginStep::Prerender { command } => AuxCommand {
                    kind: HookKind::Prerender,
                    command_line: command.clone(),
                },
                _ => continue,
            };

            if !self.latch(command.kind).try_acquire() {
                tracing::debug!(job = %job.name, "{:?} already started", command.kind);
                continue;
            }

            match self.spawner.spawn(&command) {
                Ok(()) => started.push(command.kind),
                Err(err) => {
                    tracing::warn!(command = %command.command_line, "failed to start {:?} process: {err}", command.kind)
                }
            }
        }

        started
    }

    pub fn has_started(&self, kind: HookKind) -> bool {
        self.latch(kind).is_set()
    }
}

impl Default for WriteHooks {
    fn default() -> Self {
        Self::new(Box::new(ShellSpawner))
    }
}
