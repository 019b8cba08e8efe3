//! Condition builders for WHERE fragments.
//!
//! Keys are parsed here, once, so the filter stage never re-splits them.

use crate::ast::{BuildingBlock, KeyPath, Predicate, Value};
use crate::error::SqliResult;

/// Helper to create a path node
fn make_block(key: &str, predicate: Predicate, value: Value) -> SqliResult<BuildingBlock> {
    Ok(BuildingBlock::path(KeyPath::parse(key)?, predicate, value))
}

/// Create an equality condition (key = ?)
pub fn eq(key: &str, value: impl Into<Value>) -> SqliResult<BuildingBlock> {
    make_block(key, Predicate::Eq, value.into())
}

/// Create a not-equal condition (key <> ?)
pub fn ne(key: &str, value: impl Into<Value>) -> SqliResult<BuildingBlock> {
    make_block(key, Predicate::Ne, value.into())
}

/// Create a greater-than condition (key > ?)
pub fn gt(key: &str, value: impl Into<Value>) -> SqliResult<BuildingBlock> {
    make_block(key, Predicate::Gt, value.into())
}

/// Create a greater-than-or-equal condition (key >= ?)
pub fn gte(key: &str, value: impl Into<Value>) -> SqliResult<BuildingBlock> {
    make_block(key, Predicate::Gte, value.into())
}

/// Create a less-than condition (key < ?)
pub fn lt(key: &str, value: impl Into<Value>) -> SqliResult<BuildingBlock> {
    make_block(key, Predicate::Lt, value.into())
}

/// Create a less-than-or-equal condition (key <= ?)
pub fn lte(key: &str, value: impl Into<Value>) -> SqliResult<BuildingBlock> {
    make_block(key, Predicate::Lte, value.into())
}

/// Create an IN condition (key IN ( ... ))
pub fn is_in<V: Into<Value>>(
    key: &str,
    values: impl IntoIterator<Item = V>,
) -> SqliResult<BuildingBlock> {
    let vals: Vec<Value> = values.into_iter().map(Into::into).collect();
    make_block(key, Predicate::In, Value::Array(vals))
}

/// Create a NOT IN condition (key NOT IN ( ... ))
pub fn not_in<V: Into<Value>>(
    key: &str,
    values: impl IntoIterator<Item = V>,
) -> SqliResult<BuildingBlock> {
    let vals: Vec<Value> = values.into_iter().map(Into::into).collect();
    make_block(key, Predicate::NotIn, Value::Array(vals))
}

/// Create an IS NULL condition
pub fn is_null(key: &str) -> SqliResult<BuildingBlock> {
    make_block(key, Predicate::IsNull, Value::Null)
}

/// Create an IS NOT NULL condition
pub fn is_not_null(key: &str) -> SqliResult<BuildingBlock> {
    make_block(key, Predicate::IsNotNull, Value::Null)
}

/// Create a raw fragment; each `?` in `sql` binds the next element of `values`.
pub fn raw<V: Into<Value>>(sql: &str, values: impl IntoIterator<Item = V>) -> BuildingBlock {
    let vals: Vec<Value> = values.into_iter().map(Into::into).collect();
    BuildingBlock::raw(sql, Value::Array(vals))
}

/// Create a parenthesized group
pub fn sub(children: Vec<BuildingBlock>) -> BuildingBlock {
    BuildingBlock::sub(children)
}
