//! FILENAME: report-engine/src/context.rs
//! Group contexts: what a header, footer or summary band gets to see.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::record::Record;
use crate::value::Value;

/// Alias to value map in declaration order: aggregates first, then
/// calculations, each calculation seeing every entry before it.
pub type ContextValues = IndexMap<String, Value, FxBuildHasher>;

/// Snapshot handed to header, footer and summary bands.
///
/// On a group header only `first_record` and `group_value` carry data: the
/// group has seen no records yet, so `record_count` is zero and every
/// aggregate entry holds its zero-sample value. On a footer everything is
/// final. The summary band reuses this shape with no `group_value` and no
/// first or last record.
#[derive(Debug, Clone, Default)]
pub struct GroupContext {
    /// Record that opened the group.
    pub first_record: Option<Arc<Record>>,
    /// Most recently accumulated record; `None` until the first accumulate.
    pub last_record: Option<Arc<Record>>,
    pub record_count: u64,
    /// The level's key expression evaluated on the first record: the literal
    /// group value, not the comparison token.
    pub group_value: Option<Value>,
    /// Aggregate results then calculation results, in declaration order.
    pub values: ContextValues,
}

impl GroupContext {
    pub fn get(&self, alias: &str) -> Option<&Value> {
        self.values.get(alias)
    }

    /// Numeric view of an entry; absent aliases read as zero, which keeps
    /// calculation closures free of unwrapping.
    pub fn number(&self, alias: &str) -> f64 {
        self.values.get(alias).map_or(0.0, Value::coerce_f64)
    }
}
