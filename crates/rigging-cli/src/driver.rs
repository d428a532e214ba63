//! Runs build job descriptors.
//!
//! The driver owns the steps that are not delegated: copying static assets
//! (with the entry page templated for the job's strategy) and the write
//! hooks. Compilation, resolution and minification happen in the external
//! bundler behind [`BundleBackend`].

use async_trait::async_trait;
use rigging_config::{BuildJobDescriptor, CopyStatic, HookKind, ProjectLayout, WriteHooks};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

use crate::error::{BuildError, Result};

/// Variable naming the job for the bundler process.
pub const JOB_VAR: &str = "RIGGING_JOB";

/// Executes the delegated part of a job.
#[async_trait]
pub trait BundleBackend: Send + Sync {
    async fn bundle(&self, job: &BuildJobDescriptor) -> Result<()>;
}

/// Runs the configured bundler command with the descriptor as JSON on stdin.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandBackend {
    pub fn from_layout(layout: &ProjectLayout) -> Result<Self> {
        let (program, args) = layout
            .bundler
            .command
            .split_first()
            .ok_or(BuildError::BackendNotConfigured)?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            cwd: layout.root.clone(),
        })
    }
}

#[async_trait]
impl BundleBackend for CommandBackend {
    async fn bundle(&self, job: &BuildJobDescriptor) -> Result<()> {
        let payload = job.to_json()?;

        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .env(JOB_VAR, &job.name)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| BuildError::BackendSpawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // The bundler may exit without reading its input
            if let Err(err) = stdin.write_all(payload.as_bytes()).await {
                tracing::debug!(job = %job.name, "bundler closed stdin early: {err}");
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(BuildError::BackendFailed {
                job: job.name.clone(),
                status: status.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Outcome of one job run.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub name: String,
    pub copied_assets: usize,
    pub hooks_started: Vec<HookKind>,
    pub duration: Duration,
}

/// Runs jobs and owns the per-run state: which jobs already copied their
/// static assets, and the write-hook latches.
pub struct BuildDriver {
    backend: Box<dyn BundleBackend>,
    hooks: WriteHooks,
    copied: HashSet<String>,
}

impl BuildDriver {
    pub fn new(backend: Box<dyn BundleBackend>, hooks: WriteHooks) -> Self {
        Self {
            backend,
            hooks,
            copied: HashSet::new(),
        }
    }

    /// Copy static assets, bundle, then fire the write hooks.
    ///
    /// Hooks only fire after the bundler succeeded.
    pub async fn run_job(&mut self, job: &BuildJobDescriptor) -> Result<JobReport> {
        let start = Instant::now();
        tracing::debug!(job = %job.name, steps = ?job.plugin_names(), "running job");

        let mut copied_assets = 0;
        if let Some(copy) = job.copy_static() {
            if !(copy.copy_once && self.copied.contains(&job.name)) {
                copied_assets = copy_static(copy)?;
                self.copied.insert(job.name.clone());
            }
        }

        self.backend.bundle(job).await?;
        let hooks_started = self.hooks.on_write_bundle(job);

        Ok(JobReport {
            name: job.name.clone(),
            copied_assets,
            hooks_started,
            duration: start.elapsed(),
        })
    }

    /// Run every job in list order, stopping at the first failure.
    pub async fn run_all(&mut self, jobs: &[BuildJobDescriptor]) -> Result<Vec<JobReport>> {
        let mut reports = Vec::with_capacity(jobs.len());
        for job in jobs {
            reports.push(self.run_job(job).await?);
        }
        Ok(reports)
    }

    pub fn hooks(&self) -> &WriteHooks {
        &self.hooks
    }
}

/// Copy static assets and write the templated entry page.
///
/// Returns the number of files written, the page included.
pub fn copy_static(copy: &CopyStatic) -> Result<usize> {
    if !copy.from.is_dir() {
        tracing::warn!(dir = %copy.from.display(), "static directory missing, nothing copied");
        return Ok(0);
    }

    let mut written = 0;
    for entry in WalkDir::new(&copy.from) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| copy.from.clone());
            BuildError::CopyFailed {
                path,
                source: e.into(),
            }
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() || path == copy.template {
            continue;
        }

        let dest = destination(copy, path);
        copy_file(path, &dest)?;
        written += 1;
    }

    if copy.template.is_file() {
        let template = fs::read_to_string(&copy.template).map_err(|source| BuildError::CopyFailed {
            path: copy.template.clone(),
            source,
        })?;
        let page = copy.to.join(&copy.rename);
        write_file(&page, copy.rule.apply(&template).as_bytes())?;
        written += 1;
    } else {
        tracing::warn!(template = %copy.template.display(), "page template missing");
    }

    tracing::debug!(files = written, to = %copy.to.display(), "copied static assets");
    Ok(written)
}

fn destination(copy: &CopyStatic, path: &Path) -> PathBuf {
    if copy.flatten {
        return copy.to.join(path.file_name().unwrap_or_default());
    }
    match path.strip_prefix(&copy.from) {
        Ok(relative) => copy.to.join(relative),
        Err(_) => copy.to.join(path.file_name().unwrap_or_default()),
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::CopyFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::copy(from, to).map_err(|source| BuildError::CopyFailed {
        path: from.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn write_file(to: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::CopyFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(to, contents).map_err(|source| BuildError::CopyFailed {
        path: to.to_path_buf(),
        source,
    })?;
    Ok(())
}
