//! Mode environment files (`.env.<mode>`) and the substitution table built
//! from them.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Expression prefix replaced at compile time.
pub const PROCESS_ENV_PREFIX: &str = "process.env.";

/// Path of the environment file for a mode, relative to the project root.
pub fn env_file_path(root: &Path, mode: &str) -> PathBuf {
    root.join(format!(".env.{mode}"))
}

/// Keys and values read from a mode environment file.
///
/// Keys are unique; when a file repeats a key the later line wins but the key
/// keeps its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVarTable {
    vars: IndexMap<String, String>,
}

impl EnvVarTable {
    /// Load the table from a file.
    ///
    /// # Errors
    ///
    /// A missing file is fatal (`ConfigError::EnvFileNotFound`). An empty file
    /// yields an empty table.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::EnvFileNotFound(path.to_path_buf())
            } else {
                ConfigError::Io(e)
            }
        })?;

        let table = Self::parse(&content);
        tracing::debug!(path = %path.display(), keys = table.len(), "loaded environment file");
        Ok(table)
    }

    /// Parse `KEY=VALUE` lines. Lines that cannot be parsed are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use rigging_config::EnvVarTable;
    ///
    /// let table = EnvVarTable::parse("# api\nAPI_URL=https://x.test\nnot a pair\n");
    /// assert_eq!(table.get("API_URL"), Some("https://x.test"));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn parse(content: &str) -> Self {
        let mut vars = IndexMap::new();

        for (line_num, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match parse_line(line) {
                Some((key, value)) => {
                    vars.insert(key, value);
                }
                None => {
                    tracing::debug!(line = line_num + 1, "skipping unparsable environment line");
                }
            }
        }

        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replacement rules: `process.env.<KEY>` to the value as a JSON string
    /// literal, one rule per key.
    pub fn substitutions(&self) -> IndexMap<String, String> {
        self.iter()
            .map(|(key, value)| {
                (
                    format!("{PROCESS_ENV_PREFIX}{key}"),
                    serde_json::Value::String(value.to_string()).to_string(),
                )
            })
            .collect()
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;

    let key = key.trim();
    if !is_valid_key(key) {
        return None;
    }

    Some((key.to_string(), parse_value(value.trim())))
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn parse_value(value: &str) -> String {
    let quoted = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);

    if quoted('"') {
        value[1..value.len() - 1].replace("\\n", "\n")
    } else if quoted('\'') || quoted('`') {
        value[1..value.len() - 1].to_string()
    } else {
        // Unquoted values may carry a trailing comment
        match value.find(" #") {
            Some(pos) => value[..pos].trim_end().to_string(),
            None => value.to_string(),
        }
    }
}
