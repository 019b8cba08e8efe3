//! Condition tree compiler.
//!
//! Three stages over one tree: [`filter`] prunes it against the schema,
//! [`params`] flattens its bound values, [`conditions`] emits the SQL text.
//! Stages two and three must see the same (filtered) tree so that the n-th
//! placeholder binds the n-th parameter; [`ConditionCompiler`] runs them in
//! that order.

pub mod conditions;
pub mod dialect;
pub mod filter;
pub mod params;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::ast::{BuildingBlock, Conjunction, Value};
use crate::config::CompilerConfig;
use crate::error::{SqliError, SqliResult};

pub use conditions::{SqlWriter, build_condition_sql, defuse, quote_literal, render_in_list};
pub use dialect::Dialect;
pub use filter::{FilterContext, filter_blocks};
pub use params::{ParamCollector, flatten_params};

/// Deepest sub-group nesting accepted unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 64;

pub(crate) fn check_depth(depth: usize, limit: usize) -> SqliResult<()> {
    if depth > limit {
        return Err(SqliError::NestingTooDeep { limit });
    }
    Ok(())
}

/// Elements of an IN / NOT IN value. A scalar counts as a one-element list.
pub(crate) fn membership_items(block: &BuildingBlock) -> SqliResult<&[Value]> {
    let items = match &block.value {
        Value::Array(items) => items.as_slice(),
        Value::Null => &[],
        scalar => std::slice::from_ref(scalar),
    };
    if items.is_empty() {
        return Err(SqliError::EmptyMembership {
            key: block.key.to_string(),
        });
    }
    Ok(items)
}

/// SQL condition text plus the values for its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledCondition {
    pub sql: String,
    pub params: Vec<Value>,
    /// Placeholders in `sql`; equals `params.len()` unless a raw fragment's
    /// `?` count disagrees with its value array.
    pub placeholders: usize,
}

impl CompiledCondition {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Runs filter -> flatten -> emit over a condition tree.
pub struct ConditionCompiler<'a> {
    ctx: FilterContext<'a>,
    dialect: Dialect,
}

impl<'a> ConditionCompiler<'a> {
    pub fn new(ctx: FilterContext<'a>) -> Self {
        Self {
            ctx,
            dialect: Dialect::default(),
        }
    }

    /// Apply dialect and depth limit from `config`.
    pub fn with_config(ctx: FilterContext<'a>, config: &CompilerConfig) -> Self {
        Self {
            ctx: ctx.with_max_depth(config.max_depth),
            dialect: config.dialect,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Filter `blocks` in place, then render them.
    ///
    /// After pruning, the first surviving root block loses its conjunction so
    /// the text never starts with `AND` / `OR`.
    pub fn compile(&self, blocks: &mut Vec<BuildingBlock>) -> SqliResult<CompiledCondition> {
        filter_blocks(blocks, &self.ctx)?;
        if let Some(first) = blocks.first_mut() {
            first.conjunction = Conjunction::None;
        }
        self.compile_unfiltered(blocks)
    }

    /// Render an already filtered tree, keeping root conjunctions as stored.
    pub fn compile_unfiltered(&self, blocks: &[BuildingBlock]) -> SqliResult<CompiledCondition> {
        let mut collector = ParamCollector::new(self.ctx.max_depth);
        collector.collect(blocks)?;

        let mut writer = SqlWriter::new(self.dialect, self.ctx.max_depth);
        writer.write(blocks)?;

        if writer.placeholders != collector.params.len() {
            tracing::warn!(
                placeholders = writer.placeholders,
                params = collector.params.len(),
                "raw fragment placeholders do not match their values"
            );
        }
        tracing::trace!(sql = %writer.sql, params = collector.params.len(), "compiled condition");

        Ok(CompiledCondition {
            sql: writer.sql,
            params: collector.params,
            placeholders: writer.placeholders,
        })
    }
}
