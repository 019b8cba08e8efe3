use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SqliError;

/// Placeholder style of the emitted SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `?` for every bound value (JDBC, MySQL, SQLite).
    #[default]
    Question,
    /// `$1`, `$2`, ... in emission order.
    Postgres,
}

impl Dialect {
    /// Placeholder for the `index`-th bound value (1-based).
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Question => "?".to_string(),
            Dialect::Postgres => format!("${}", index),
        }
    }
}

impl FromStr for Dialect {
    type Err = SqliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "question" | "mysql" | "sqlite" | "jdbc" => Ok(Dialect::Question),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            other => Err(SqliError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Question => write!(f, "question"),
            Dialect::Postgres => write!(f, "postgres"),
        }
    }
}
