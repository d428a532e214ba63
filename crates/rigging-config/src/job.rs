//! Build job descriptors handed to the bundler.
//!
//! A descriptor is plain data: the output target, the ordered plugin chain,
//! and the watch policy. It serializes to JSON so that an external bundler
//! can execute it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::environment::BundlingStrategy;
use crate::html::HtmlTemplatingRule;

/// Module format of the emitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Self-executing script
    Iife,
    /// Native ES modules
    Esm,
}

/// Where a job writes its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutputTarget {
    File { format: OutputFormat, file: PathBuf },
    Dir { format: OutputFormat, dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    pub name: String,
    pub sourcemap: bool,
    #[serde(flatten)]
    pub target: OutputTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchPolicy {
    pub clear_screen: bool,
}

impl Default for WatchPolicy {
    fn default() -> Self {
        Self {
            clear_screen: false,
        }
    }
}

/// Static assets copied into the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyStatic {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Page template, written through `rule` instead of being copied
    pub template: PathBuf,
    pub rename: String,
    pub rule: HtmlTemplatingRule,
    pub copy_once: bool,
    pub flatten: bool,
}

/// One transform in a job's plugin chain. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum PluginStep {
    Alias {
        find: String,
        replacement: PathBuf,
        extensions: Vec<String>,
    },
    CopyStatic(CopyStatic),
    Compile {
        dev: bool,
        hydratable: bool,
        css_output: PathBuf,
        style_prelude: Option<String>,
    },
    Replace {
        values: IndexMap<String, String>,
    },
    Resolve {
        browser: bool,
        dedupe: Vec<String>,
    },
    CommonJs,
    Minify,
    Serve {
        command: String,
    },
    LiveReload {
        dir: PathBuf,
    },
    Prerender {
        command: String,
    },
}

impl PluginStep {
    pub fn name(&self) -> &'static str {
        match self {
            PluginStep::Alias { .. } => "alias",
            PluginStep::CopyStatic(_) => "copy-static",
            PluginStep::Compile { .. } => "compile",
            PluginStep::Replace { .. } => "replace",
            PluginStep::Resolve { .. } => "resolve",
            PluginStep::CommonJs => "common-js",
            PluginStep::Minify => "minify",
            PluginStep::Serve { .. } => "serve",
            PluginStep::LiveReload { .. } => "live-reload",
            PluginStep::Prerender { .. } => "prerender",
        }
    }
}

/// One output target and everything needed to build it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildJobDescriptor {
    pub name: String,
    pub strategy: BundlingStrategy,
    pub input: PathBuf,
    pub inline_dynamic_imports: bool,
    pub output: OutputOptions,
    pub plugins: Vec<PluginStep>,
    pub watch: WatchPolicy,
}

impl BuildJobDescriptor {
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(PluginStep::name).collect()
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub fn copy_static(&self) -> Option<&CopyStatic> {
        self.plugins.iter().find_map(|p| match p {
            PluginStep::CopyStatic(copy) => Some(copy),
            _ => None,
        })
    }

    pub fn substitutions(&self) -> Option<&IndexMap<String, String>> {
        self.plugins.iter().find_map(|p| match p {
            PluginStep::Replace { values } => Some(values),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
