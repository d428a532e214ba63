//! Build environment flags derived from process variables.
//!
//! The flags are computed exactly once, from a variable lookup, and then
//! passed down through the derivation. Nothing downstream reads the process
//! environment again, which keeps the derivation a pure function of its
//! inputs and lets tests drive it with a plain map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};

/// Set by the invoking tool while it runs in watch mode. Only presence matters.
pub const WATCH_VAR: &str = "ROLLUP_WATCH";
/// Explicit bundling strategy override (`bundle` or `dynamic`).
pub const BUNDLING_VAR: &str = "BUNDLING";
/// Explicit prerender override.
pub const PRERENDER_VAR: &str = "PRERENDER";
/// Mode name, also selects the `.env.<mode>` file.
pub const MODE_VAR: &str = "NODE_ENV";

pub const DEFAULT_MODE: &str = "development";

/// How the application is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlingStrategy {
    /// One self-executing script containing the whole graph
    Bundle,
    /// Code-split ES modules loaded on demand
    Dynamic,
}

impl BundlingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundlingStrategy::Bundle => "bundle",
            BundlingStrategy::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for BundlingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BundlingStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bundle" => Ok(BundlingStrategy::Bundle),
            "dynamic" => Ok(BundlingStrategy::Dynamic),
            _ => Err(ConfigError::InvalidValue {
                field: BUNDLING_VAR.to_string(),
                value: s.to_string(),
                hint: "expected 'bundle' or 'dynamic'".to_string(),
            }),
        }
    }
}

/// Flags that drive job derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEnvironment {
    pub is_production: bool,
    pub bundling: BundlingStrategy,
    pub should_prerender: bool,
    pub mode: String,
}

impl BuildEnvironment {
    /// Compute the flags from a variable lookup.
    ///
    /// # Example
    ///
    /// ```
    /// use rigging_config::{BuildEnvironment, BundlingStrategy};
    ///
    /// // No watch signal: a production build
    /// let env = BuildEnvironment::from_lookup(|_| None).unwrap();
    /// assert!(env.is_production);
    /// assert_eq!(env.bundling, BundlingStrategy::Dynamic);
    /// assert!(env.should_prerender);
    /// assert_eq!(env.mode, "development");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_production = lookup(WATCH_VAR).is_none();

        let bundling = match lookup(BUNDLING_VAR).filter(|v| !v.trim().is_empty()) {
            Some(value) => value.parse()?,
            None if is_production => BundlingStrategy::Dynamic,
            None => BundlingStrategy::Bundle,
        };

        let should_prerender = match lookup(PRERENDER_VAR) {
            Some(value) => parse_switch(&value),
            None => is_production,
        };

        let mode = lookup(MODE_VAR)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODE.to_string());

        let env = Self {
            is_production,
            bundling,
            should_prerender,
            mode,
        };
        tracing::debug!(?env, "resolved build environment");
        Ok(env)
    }

    /// Compute the flags from a fixed set of variables.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    /// Compute the flags from the current process environment.
    pub fn from_process_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// On/off reading of a present variable. Beyond the empty value, `0`,
/// `false`, `no` and `off` (any case) also mean off, so `PRERENDER=false`
/// disables prerendering rather than counting as a non-empty, truthy string.
fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
