//! Compiler configuration, read from `sqli.toml`.
//!
//! ```toml
//! dialect = "postgres"
//! max_depth = 32
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SqliResult;
use crate::transpiler::{DEFAULT_MAX_DEPTH, Dialect};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Placeholder style.
    pub dialect: Dialect,
    /// Deepest sub-group nesting accepted.
    pub max_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompilerConfig {
    pub fn from_toml(input: &str) -> SqliResult<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_file(path: &Path) -> SqliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// `<config dir>/sqli/sqli.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sqli").join("sqli.toml"))
    }

    /// Load from `path` if given, else from the default location; a missing
    /// default file yields the defaults.
    pub fn load(path: Option<&Path>) -> SqliResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}
