use serde::{Deserialize, Serialize};

use crate::ast::{Conjunction, Key, KeyPath, Predicate, Value};
use crate::error::SqliError;

/// One node of a condition tree.
///
/// `sub_list` is only populated for [`Predicate::Sub`]; `value` is ignored by
/// null checks and must be an array for IN / NOT IN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireBlock", into = "WireBlock")]
pub struct BuildingBlock {
    pub conjunction: Conjunction,
    pub key: Key,
    pub predicate: Predicate,
    pub value: Value,
    pub sub_list: Vec<BuildingBlock>,
}

impl BuildingBlock {
    /// Node addressing a field path.
    pub fn path(key: KeyPath, predicate: Predicate, value: Value) -> Self {
        Self {
            conjunction: Conjunction::None,
            key: Key::Path(key),
            predicate,
            value,
            sub_list: Vec::new(),
        }
    }

    /// Raw fragment; elements of `values` bind to its `?` markers in order.
    pub fn raw(sql: impl Into<String>, values: Value) -> Self {
        Self {
            conjunction: Conjunction::None,
            key: Key::Raw(sql.into()),
            predicate: Predicate::X,
            value: values,
            sub_list: Vec::new(),
        }
    }

    /// Parenthesized group.
    pub fn sub(children: Vec<BuildingBlock>) -> Self {
        Self {
            conjunction: Conjunction::None,
            key: Key::None,
            predicate: Predicate::Sub,
            value: Value::Null,
            sub_list: children,
        }
    }

    pub fn with_conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }

    pub fn and(self) -> Self {
        self.with_conjunction(Conjunction::And)
    }

    pub fn or(self) -> Self {
        self.with_conjunction(Conjunction::Or)
    }

    /// Total number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self.sub_list.iter().map(BuildingBlock::node_count).sum::<usize>()
    }
}

impl std::fmt::Display for BuildingBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.predicate {
            Predicate::Sub => write!(f, "{} SUB[{}]", self.conjunction, self.sub_list.len()),
            p if p.is_null_check() => write!(f, "{} {} {}", self.conjunction, self.key, p),
            _ => write!(
                f,
                "{} {} {} {}",
                self.conjunction, self.key, self.predicate, self.value
            ),
        }
    }
}

/// JSON shape of a node: the key is plain text, parsed by predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireBlock {
    #[serde(default)]
    conjunction: Conjunction,
    #[serde(default)]
    key: String,
    predicate: Predicate,
    #[serde(default)]
    value: Value,
    #[serde(default, alias = "subNodes", skip_serializing_if = "Vec::is_empty")]
    sub_list: Vec<BuildingBlock>,
}

impl TryFrom<WireBlock> for BuildingBlock {
    type Error = SqliError;

    fn try_from(wire: WireBlock) -> Result<Self, Self::Error> {
        let key = match wire.predicate {
            Predicate::Sub => Key::None,
            Predicate::X => Key::Raw(wire.key),
            _ => Key::Path(KeyPath::parse(&wire.key)?),
        };
        Ok(Self {
            conjunction: wire.conjunction,
            key,
            predicate: wire.predicate,
            value: wire.value,
            sub_list: wire.sub_list,
        })
    }
}

impl From<BuildingBlock> for WireBlock {
    fn from(block: BuildingBlock) -> Self {
        Self {
            conjunction: block.conjunction,
            key: block.key.to_string(),
            predicate: block.predicate,
            value: block.value,
            sub_list: block.sub_list,
        }
    }
}
