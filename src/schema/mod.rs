//! Schema metadata consumed by the filter stage.
//!
//! The filter stage only sees the [`SchemaLookup`], [`ParsedSchema`] and
//! [`TypeCoercion`] traits. [`Schema`] is the reference implementation used by
//! the CLI and tests, loadable from JSON or TOML.
//!
//! # Example
//! ```
//! use sqli::schema::Schema;
//!
//! let json = r#"{
//!     "tables": [{
//!         "name": "Cat",
//!         "columns": [
//!             { "name": "id", "type": "integer", "primitive": true },
//!             { "name": "name", "type": "text" }
//!         ]
//!     }]
//! }"#;
//!
//! let schema = Schema::from_json(json).unwrap();
//! assert!(schema.table("Cat").is_some());
//! ```

pub mod coercion;

pub use coercion::{EpochMillis, TypeCoercion};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ast::Value;
use crate::error::{SqliError, SqliResult};

/// Resolves a schema identifier to its parsed metadata.
pub trait SchemaLookup {
    fn parsed(&self, schema: &str) -> Option<&dyn ParsedSchema>;
}

/// Metadata of one schema (entity / table).
pub trait ParsedSchema {
    fn name(&self) -> &str;

    /// Whether `field <op> value` imposes no real constraint given the declared type.
    fn is_base_type_redundant(&self, field: &str, value: &Value) -> bool;

    /// Declared type of `field`, `None` when the schema has no such element.
    fn element(&self, field: &str) -> Option<FieldType>;
}

/// Declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    Timestamp,
    Enum,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Decimal)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::Timestamp)
    }
}

/// Database schema definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<TableDef>,
}

/// Table definition with columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

/// Column definition with type information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type", alias = "typ")]
    pub typ: FieldType,
    /// Primitive columns are never absent: their zero default stands for "unset".
    #[serde(default)]
    pub primitive: bool,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Load schema from JSON string.
    pub fn from_json(json: &str) -> SqliResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load schema from TOML string (`[[tables]]` / `[[tables.columns]]`).
    pub fn from_toml(input: &str) -> SqliResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load schema from file path (`.json` is JSON, anything else TOML).
    pub fn from_file(path: &Path) -> SqliResult<Self> {
        let content = std::fs::read_to_string(path)?;

        if path.extension().is_some_and(|e| e == "json") {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }
}

impl SchemaLookup for Schema {
    fn parsed(&self, schema: &str) -> Option<&dyn ParsedSchema> {
        self.table(schema).map(|t| t as &dyn ParsedSchema)
    }
}

impl TableDef {
    /// Create a new table definition.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn column_def(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Builder: add a nullable column.
    pub fn column(mut self, name: &str, typ: FieldType) -> Self {
        self.columns.push(ColumnDef {
            name: name.to_string(),
            typ,
            primitive: false,
        });
        self
    }

    /// Builder: add a primitive column.
    pub fn primitive(mut self, name: &str, typ: FieldType) -> Self {
        self.columns.push(ColumnDef {
            name: name.to_string(),
            typ,
            primitive: true,
        });
        self
    }
}

impl ParsedSchema for TableDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_base_type_redundant(&self, field: &str, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self.column_def(field) {
            // Undeclared field: a zero number still reads as "unset".
            None => value.is_numeric_zero(),
            Some(col) => col.primitive && col.typ.is_numeric() && value.is_numeric_zero(),
        }
    }

    fn element(&self, field: &str) -> Option<FieldType> {
        self.column_def(field).map(|c| c.typ)
    }
}

/// Resolve `schema` through `lookup`, failing with [`SqliError::UnknownSchema`].
pub fn resolve<'a>(lookup: &'a dyn SchemaLookup, schema: &str) -> SqliResult<&'a dyn ParsedSchema> {
    lookup
        .parsed(schema)
        .ok_or_else(|| SqliError::UnknownSchema(schema.to_string()))
}
