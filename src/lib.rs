//! # sqli: condition trees to parameterized SQL
//!
//! sqli compiles a tree of filter conditions into a SQL condition fragment and
//! the ordered list of values bound to its placeholders. Before rendering, the
//! tree is pruned against schema metadata: conditions that constrain nothing
//! are dropped, comparison values are coerced to the declared column type.
//!
//! ## Quick Example
//!
//! ```
//! use std::collections::HashMap;
//! use sqli::prelude::*;
//!
//! let schema = Schema {
//!     tables: vec![TableDef::new("User")
//!         .column("age", FieldType::Integer)
//!         .column("name", FieldType::Text)],
//! };
//! let aliases = HashMap::new();
//! let ctx = FilterContext::new(&schema, "User", &aliases);
//!
//! let mut blocks = vec![gt("age", 18)?, eq("name", "Alice")?.and()];
//! let compiled = sqli::compile(&mut blocks, ctx)?;
//!
//! assert_eq!(compiled.sql, "age > ? AND name = ?");
//! assert_eq!(compiled.params, vec![Value::Int(18), Value::from("Alice")]);
//! # Ok::<(), sqli::error::SqliError>(())
//! ```
//!
//! ## Predicates
//!
//! | Predicate            | Renders as               | Binds            |
//! |----------------------|--------------------------|------------------|
//! | `EQ` .. `LTE`        | `key = ?`                | the value        |
//! | `IN`, `NOT_IN`       | `key IN ( 'a', 'b' )`    | nothing (inline) |
//! | `IS_NULL`, `IS_NOT_NULL` | `key IS NULL`        | nothing          |
//! | `X`                  | the raw fragment         | its value array  |
//! | `SUB`                | `( ... )`                | its children     |
//!
//! IN lists are written into the SQL text, not bound. Their string elements
//! only get the narrow [`transpiler::defuse`] treatment; see
//! [`transpiler::conditions`].

pub mod ast;
pub mod config;
pub mod error;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::CompilerConfig;
    pub use crate::error::*;
    pub use crate::schema::{
        ColumnDef, EpochMillis, FieldType, ParsedSchema, Schema, SchemaLookup, TableDef,
        TypeCoercion,
    };
    pub use crate::transpiler::{
        CompiledCondition, ConditionCompiler, Dialect, FilterContext, build_condition_sql,
        filter_blocks, flatten_params,
    };
}

/// Filter `blocks` in place and compile them with the default dialect.
pub fn compile(
    blocks: &mut Vec<ast::BuildingBlock>,
    ctx: transpiler::FilterContext<'_>,
) -> error::SqliResult<transpiler::CompiledCondition> {
    transpiler::ConditionCompiler::new(ctx).compile(blocks)
}
