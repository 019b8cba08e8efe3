//! Bound-parameter flattening.
//!
//! Walks a filtered tree in the exact order [`super::conditions`] emits
//! placeholders, so the n-th value here binds the n-th placeholder there.

use crate::ast::{BuildingBlock, Predicate, Value};
use crate::error::SqliResult;
use crate::transpiler::{DEFAULT_MAX_DEPTH, check_depth};

/// Collected parameter values in placeholder order.
#[derive(Debug)]
pub struct ParamCollector {
    pub params: Vec<Value>,
    max_depth: usize,
}

impl ParamCollector {
    pub fn new(max_depth: usize) -> Self {
        Self {
            params: Vec::new(),
            max_depth,
        }
    }

    pub fn collect(&mut self, blocks: &[BuildingBlock]) -> SqliResult<()> {
        self.collect_level(blocks, 0)
    }

    fn collect_level(&mut self, blocks: &[BuildingBlock], depth: usize) -> SqliResult<()> {
        check_depth(depth, self.max_depth)?;

        for block in blocks {
            match block.predicate {
                Predicate::Sub => self.collect_level(&block.sub_list, depth + 1)?,
                Predicate::X => {
                    // only arrays bind; anything else rides along unbound
                    if let Value::Array(items) = &block.value {
                        self.params.extend(items.iter().map(Value::to_bind));
                    }
                }
                // IN lists are inlined; null checks carry no value
                Predicate::In | Predicate::NotIn | Predicate::IsNull | Predicate::IsNotNull => {}
                Predicate::Eq
                | Predicate::Ne
                | Predicate::Gt
                | Predicate::Gte
                | Predicate::Lt
                | Predicate::Lte => {
                    if !block.value.is_null() {
                        self.params.push(block.value.to_bind());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Flatten the bound values of `blocks`.
pub fn flatten_params(blocks: &[BuildingBlock]) -> SqliResult<Vec<Value>> {
    let mut collector = ParamCollector::new(DEFAULT_MAX_DEPTH);
    collector.collect(blocks)?;
    Ok(collector.params)
}
