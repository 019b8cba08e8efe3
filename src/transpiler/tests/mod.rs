//! Transpiler test modules.
//!
//! Tests are organized by stage:
//! - `pipeline`: end-to-end compilation and SQL emission
//! - `filter`: schema-aware pruning and coercion


use std::collections::HashMap;

use crate::schema::{FieldType, Schema, TableDef};

/// `Cat` (primary) and `Owner` (aliased as `o`).
pub(super) fn pets() -> Schema {
    Schema {
        tables: vec![
            TableDef::new("Cat")
                .primitive("id", FieldType::Integer)
                .column("age", FieldType::Integer)
                .column("name", FieldType::Text)
                .column("status", FieldType::Enum)
                .column("born", FieldType::Timestamp)
                .column("x", FieldType::Integer)
                .column("y", FieldType::Integer),
            TableDef::new("Owner")
                .primitive("id", FieldType::Integer)
                .column("city", FieldType::Text),
        ],
    }
}

pub(super) fn aliases() -> HashMap<String, String> {
    HashMap::from([("o".to_string(), "Owner".to_string())])
}
