//! Project layout: where sources, static assets and output live, and which
//! commands the write hooks run.
//!
//! Loaded from built-in defaults, then `rigging.toml` in the project root,
//! then `RIGGING_*` variables (e.g. `RIGGING_LAYOUT__DIST_DIR=public`).

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::error::{ConfigError, Result};

pub const CONFIG_FILE: &str = "rigging.toml";

/// Directory layout of the scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Static assets copied verbatim into `dist_dir`
    pub static_dir: PathBuf,

    /// Output root, cleared before every derivation
    pub dist_dir: PathBuf,

    /// Directory under `dist_dir` receiving scripts and styles
    pub build_subdir: String,

    /// Application entry module
    pub input: PathBuf,

    /// Page template inside `static_dir`
    pub template: String,

    /// Name of the templated page written to `dist_dir`
    pub app_html: String,

    /// Global name of the self-executing bundle
    pub bundle_name: String,

    pub sourcemap: bool,

    /// Import prefix resolved to the source directory
    pub alias: String,

    pub source_dir: PathBuf,

    pub extensions: Vec<String>,

    /// Packages that must resolve to a single copy
    pub dedupe: Vec<String>,

    /// Prepended to every stylesheet handed to the preprocessor
    pub style_prelude: Option<String>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            dist_dir: PathBuf::from("dist"),
            build_subdir: "build".to_string(),
            input: PathBuf::from("src/main.js"),
            template: "__index.html".to_string(),
            app_html: "__app.html".to_string(),
            bundle_name: "app".to_string(),
            sourcemap: true,
            alias: "@src".to_string(),
            source_dir: PathBuf::from("src"),
            extensions: [".mjs", ".js", ".svelte", ".scss"]
                .into_iter()
                .map(String::from)
                .collect(),
            dedupe: vec!["svelte".to_string()],
            style_prelude: Some("@import './src/styles/variables.scss';".to_string()),
        }
    }
}

/// Commands spawned after a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookCommands {
    pub serve: String,
    pub prerender: String,
}

impl Default for HookCommands {
    fn default() -> Self {
        Self {
            serve: "npm run serve".to_string(),
            prerender: "npm run export".to_string(),
        }
    }
}

/// External bundler that executes descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerCommand {
    /// Program and arguments; the descriptor is written to its stdin as JSON
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct LayoutFile {
    layout: LayoutOptions,
    hooks: HookCommands,
    bundler: BundlerCommand,
}

/// Resolved project layout anchored at a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub options: LayoutOptions,
    pub hooks: HookCommands,
    pub bundler: BundlerCommand,
}

impl ProjectLayout {
    /// Default layout rooted at `root`, ignoring any config file.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options: LayoutOptions::default(),
            hooks: HookCommands::default(),
            bundler: BundlerCommand::default(),
        }
    }

    /// Load the layout for a project root.
    ///
    /// Priority: `RIGGING_*` variables > `rigging.toml` > defaults.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let file: LayoutFile = Figment::new()
            .merge(Serialized::defaults(LayoutFile::default()))
            .merge(Toml::file(root.join(CONFIG_FILE)))
            .merge(Env::prefixed("RIGGING_").split("__"))
            .extract()?;

        Ok(Self {
            root: root.to_path_buf(),
            options: file.layout,
            hooks: file.hooks,
            bundler: file.bundler,
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn static_dir(&self) -> PathBuf {
        self.resolve(&self.options.static_dir)
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.resolve(&self.options.dist_dir)
    }

    /// The output directory, refused unless it lies strictly inside the
    /// project root. It is deleted before every build, so `.`, `..`, the
    /// root itself and anything outside it are rejected.
    ///
    /// Symlinks in the existing part of both paths are resolved first.
    pub fn checked_dist_dir(&self) -> Result<PathBuf> {
        let root = real_path(&self.root);
        let dist = real_path(&self.dist_dir());

        if dist != root && dist.starts_with(&root) {
            return Ok(dist);
        }

        Err(ConfigError::InvalidValue {
            field: "layout.dist_dir".to_string(),
            value: self.options.dist_dir.display().to_string(),
            hint: format!("must be a directory inside {}", self.root.display()),
        })
    }

    pub fn build_dir(&self) -> PathBuf {
        self.dist_dir().join(&self.options.build_subdir)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.resolve(&self.options.source_dir)
    }

    pub fn input(&self) -> PathBuf {
        self.resolve(&self.options.input)
    }

    pub fn template_path(&self) -> PathBuf {
        self.static_dir().join(&self.options.template)
    }

    pub fn app_html_path(&self) -> PathBuf {
        self.dist_dir().join(&self.options.app_html)
    }

    /// Public URL prefix of the build directory, e.g. `/build`.
    pub fn build_url(&self) -> String {
        format!("/{}", self.options.build_subdir.trim_matches('/'))
    }
}

/// Absolute, `..`-free form of `path` with its longest existing prefix
/// canonicalized. The path itself need not exist.
fn real_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normal = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }

    let mut existing = normal.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(real) = existing.canonicalize() {
            return missing.iter().rev().fold(real, |acc, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return normal,
        }
    }
}
