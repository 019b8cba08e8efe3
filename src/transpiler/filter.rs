//! Schema-aware pruning of condition trees.
//!
//! Removes nodes that constrain nothing (null values, zero defaults of primitive
//! columns, empty groups) and coerces comparison values to the declared column
//! type. The tree is edited in place; removal is structural.

use std::collections::HashMap;

use crate::ast::{BuildingBlock, KeyPath, Predicate};
use crate::error::{SqliError, SqliResult};
use crate::schema::{self, EpochMillis, ParsedSchema, SchemaLookup, TypeCoercion};
use crate::transpiler::{DEFAULT_MAX_DEPTH, check_depth, membership_items};

/// Everything the filter stage resolves keys against.
pub struct FilterContext<'a> {
    pub lookup: &'a dyn SchemaLookup,
    /// Schema of bare (unaliased) keys.
    pub primary: &'a str,
    /// Alias token -> schema name. Unmapped aliases are used as schema names.
    pub aliases: &'a HashMap<String, String>,
    pub coercion: &'a dyn TypeCoercion,
    pub max_depth: usize,
}

impl<'a> FilterContext<'a> {
    pub fn new(
        lookup: &'a dyn SchemaLookup,
        primary: &'a str,
        aliases: &'a HashMap<String, String>,
    ) -> Self {
        Self {
            lookup,
            primary,
            aliases,
            coercion: &EpochMillis,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_coercion(mut self, coercion: &'a dyn TypeCoercion) -> Self {
        self.coercion = coercion;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Schema name a key path belongs to.
    pub fn schema_name<'k>(&'k self, path: &'k KeyPath) -> &'k str {
        match &path.alias {
            Some(alias) => self.aliases.get(alias).map_or(alias.as_str(), String::as_str),
            None => self.primary,
        }
    }

    fn resolve(&self, path: &KeyPath) -> SqliResult<&'a dyn ParsedSchema> {
        schema::resolve(self.lookup, self.schema_name(path))
    }
}

/// Prune `blocks` in place. On error the tree may be partially pruned and must
/// not be rendered.
pub fn filter_blocks(blocks: &mut Vec<BuildingBlock>, ctx: &FilterContext<'_>) -> SqliResult<()> {
    let before: usize = blocks.iter().map(BuildingBlock::node_count).sum();
    filter_level(blocks, ctx, 0)?;
    let after: usize = blocks.iter().map(BuildingBlock::node_count).sum();
    tracing::trace!(before, after, "filtered condition tree");
    Ok(())
}

fn filter_level(blocks: &mut Vec<BuildingBlock>, ctx: &FilterContext<'_>, depth: usize) -> SqliResult<()> {
    check_depth(depth, ctx.max_depth)?;

    let mut failure = None;
    blocks.retain_mut(|block| {
        if failure.is_some() {
            return true;
        }
        match keep_block(block, ctx, depth) {
            Ok(keep) => keep,
            Err(e) => {
                failure = Some(e);
                true
            }
        }
    });
    failure.map_or(Ok(()), Err)
}

/// Returns whether `block` survives, pruning its children on the way.
fn keep_block(block: &mut BuildingBlock, ctx: &FilterContext<'_>, depth: usize) -> SqliResult<bool> {
    let predicate = block.predicate;
    if predicate == Predicate::Sub {
        filter_level(&mut block.sub_list, ctx, depth + 1)?;
        if block.sub_list.is_empty() {
            tracing::debug!("pruned empty sub-group");
            return Ok(false);
        }
        return Ok(true);
    }
    if predicate.is_comparison() && !keep_comparison(block, ctx)? {
        return Ok(false);
    }
    if predicate.is_membership() && !keep_membership(block, ctx)? {
        return Ok(false);
    }

    if !block.sub_list.is_empty() {
        filter_level(&mut block.sub_list, ctx, depth + 1)?;
    }
    Ok(true)
}

fn keep_comparison(block: &mut BuildingBlock, ctx: &FilterContext<'_>) -> SqliResult<bool> {
    let path = block
        .key
        .as_path()
        .ok_or_else(|| SqliError::InvalidKey(block.key.to_string()))?;
    let parsed = ctx.resolve(path)?;

    if parsed.is_base_type_redundant(&path.field, &block.value) {
        tracing::debug!(key = %path, value = %block.value, "pruned redundant comparison");
        return Ok(false);
    }

    let typ = parsed
        .element(&path.field)
        .ok_or_else(|| SqliError::field_not_found(parsed.name(), &path.field))?;

    let value = std::mem::take(&mut block.value);
    block.value = ctx.coercion.coerce(typ, value);
    if block.value.is_null() {
        tracing::debug!(key = %path, "pruned comparison without a usable value");
        return Ok(false);
    }
    Ok(true)
}

fn keep_membership(block: &BuildingBlock, ctx: &FilterContext<'_>) -> SqliResult<bool> {
    let items = membership_items(block)?;
    if items.len() > 1 {
        return Ok(true);
    }

    let path = block
        .key
        .as_path()
        .ok_or_else(|| SqliError::InvalidKey(block.key.to_string()))?;
    let parsed = ctx.resolve(path)?;

    if parsed.is_base_type_redundant(&path.field, &items[0]) {
        tracing::debug!(key = %path, "pruned redundant single-element membership");
        return Ok(false);
    }
    Ok(true)
}
