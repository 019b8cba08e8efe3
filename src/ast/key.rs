//! Field paths and raw fragments addressed by condition nodes.

use crate::error::{SqliError, SqliResult};
use std::str::FromStr;

/// A `field` or `alias.field` reference, parsed once when the node is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    pub alias: Option<String>,
    pub field: String,
}

impl KeyPath {
    /// Bare field on the primary schema.
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            alias: None,
            field: field.into(),
        }
    }

    /// Field qualified by a join alias.
    pub fn aliased(alias: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            field: field.into(),
        }
    }

    /// Parse `field` or `alias.field`.
    pub fn parse(input: &str) -> SqliResult<Self> {
        let input = input.trim();
        let invalid = || SqliError::InvalidKey(input.to_string());

        match input.split_once('.') {
            None if is_ident(input) => Ok(Self::field(input)),
            Some((alias, field)) if is_ident(alias) && is_ident(field) => {
                Ok(Self::aliased(alias, field))
            }
            _ => Err(invalid()),
        }
    }
}

fn is_ident(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl FromStr for KeyPath {
    type Err = SqliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}.{}", alias, self.field),
            None => write!(f, "{}", self.field),
        }
    }
}

/// What a node addresses: nothing (groups), a field path, or a raw fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Key {
    #[default]
    None,
    Path(KeyPath),
    /// Raw SQL text; `?` marks each bound value.
    Raw(String),
}

impl Key {
    pub fn as_path(&self) -> Option<&KeyPath> {
        match self {
            Key::Path(path) => Some(path),
            _ => None,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::None => Ok(()),
            Key::Path(path) => write!(f, "{}", path),
            Key::Raw(sql) => f.write_str(sql),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_and_aliased() {
        assert_eq!(KeyPath::parse("age").unwrap(), KeyPath::field("age"));
        assert_eq!(
            KeyPath::parse("c.colour").unwrap(),
            KeyPath::aliased("c", "colour")
        );
        assert_eq!(KeyPath::aliased("c", "colour").to_string(), "c.colour");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", ".age", "c.", "a.b.c", "age = 1", "na me"] {
            assert!(
                matches!(KeyPath::parse(bad), Err(SqliError::InvalidKey(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
