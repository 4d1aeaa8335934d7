//! FILENAME: report-engine/src/definition.rs
//! Report definition - the configuration layer.
//!
//! This module contains all the types needed to DESCRIBE a report: how the
//! stream breaks into groups, which aggregates run at each level, and what
//! the detail columns look like. Definitions carry closures (computed keys,
//! calculations, format callbacks), so unlike records they are not
//! serializable; build them in code, typically through
//! [`ReportBuilder`](crate::builder::ReportBuilder).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::context::GroupContext;
use crate::error::ReportError;
use crate::record::Record;
use crate::value::Value;

// ============================================================================
// FIELD EXPRESSIONS
// ============================================================================

/// How a value is read out of a record: by field name or by function.
///
/// Everywhere the engine takes a field (group keys, aggregate inputs) it
/// takes one of these, so a computed expression can stand in for a stored
/// field without the call site caring which it got.
#[derive(Clone)]
pub enum FieldExpr {
    /// Read the named field; missing fields read as [`Value::Null`].
    Named(String),
    /// Evaluate the function against the whole record.
    Computed(Arc<dyn Fn(&Record) -> Value + Send + Sync>),
}

impl FieldExpr {
    /// Wraps a closure as a computed expression.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        FieldExpr::Computed(Arc::new(f))
    }

    /// Evaluates this expression against a record.
    pub fn extract(&self, record: &Record) -> Value {
        match self {
            FieldExpr::Named(name) => record.get(name).cloned().unwrap_or(Value::Null),
            FieldExpr::Computed(f) => f(record),
        }
    }
}

impl fmt::Debug for FieldExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldExpr::Named(name) => f.debug_tuple("Named").field(name).finish(),
            FieldExpr::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for FieldExpr {
    fn from(name: &str) -> Self {
        FieldExpr::Named(name.to_string())
    }
}

impl From<String> for FieldExpr {
    fn from(name: String) -> Self {
        FieldExpr::Named(name)
    }
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// Supported aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Sum => "sum",
            AggregateKind::Avg => "avg",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
            AggregateKind::Count => "count",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, ReportError> {
        match s {
            "sum" => Ok(AggregateKind::Sum),
            "avg" => Ok(AggregateKind::Avg),
            "min" => Ok(AggregateKind::Min),
            "max" => Ok(AggregateKind::Max),
            "count" => Ok(AggregateKind::Count),
            other => Err(ReportError::UnknownAggregate(other.to_string())),
        }
    }
}

/// One aggregate attached to a group level: what to compute, over which
/// input, published under which alias.
#[derive(Debug, Clone)]
pub struct AggregateSpec {
    pub kind: AggregateKind,
    pub field: FieldExpr,
    pub alias: String,
}

// ============================================================================
// CALCULATIONS
// ============================================================================

/// Derived value computed when a group closes (or at the report summary),
/// from the group's finished context.
pub type CalculationFn = Arc<dyn Fn(&GroupContext) -> Value + Send + Sync>;

/// A named calculation on a group level.
///
/// Calculations run in declaration order, each seeing the aggregates and
/// every earlier calculation of the same context.
#[derive(Clone)]
pub struct CalculationSpec {
    pub alias: String,
    pub func: CalculationFn,
}

impl fmt::Debug for CalculationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculationSpec")
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// GROUP LEVELS
// ============================================================================

/// Static description of one nesting level: its key expression plus the
/// aggregates and calculations scoped to it.
///
/// A level cannot exist without a key, which is what makes "aggregate with
/// no group" unrepresentable here; the builder reports that misuse instead.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    pub key: FieldExpr,
    pub aggregates: Vec<AggregateSpec>,
    pub calculations: Vec<CalculationSpec>,
}

impl GroupSpec {
    pub fn new(key: impl Into<FieldExpr>) -> Self {
        GroupSpec {
            key: key.into(),
            aggregates: Vec::new(),
            calculations: Vec::new(),
        }
    }

    pub fn add_aggregate(
        &mut self,
        kind: AggregateKind,
        field: impl Into<FieldExpr>,
        alias: impl Into<String>,
    ) {
        self.aggregates.push(AggregateSpec {
            kind,
            field: field.into(),
            alias: alias.into(),
        });
    }

    pub fn add_calculation<F>(&mut self, alias: impl Into<String>, func: F)
    where
        F: Fn(&GroupContext) -> Value + Send + Sync + 'static,
    {
        self.calculations.push(CalculationSpec {
            alias: alias.into(),
            func: Arc::new(func),
        });
    }

    // Chainable forms for building a level directly.

    pub fn sum(mut self, field: impl Into<FieldExpr>, alias: impl Into<String>) -> Self {
        self.add_aggregate(AggregateKind::Sum, field, alias);
        self
    }

    pub fn avg(mut self, field: impl Into<FieldExpr>, alias: impl Into<String>) -> Self {
        self.add_aggregate(AggregateKind::Avg, field, alias);
        self
    }

    pub fn min(mut self, field: impl Into<FieldExpr>, alias: impl Into<String>) -> Self {
        self.add_aggregate(AggregateKind::Min, field, alias);
        self
    }

    pub fn max(mut self, field: impl Into<FieldExpr>, alias: impl Into<String>) -> Self {
        self.add_aggregate(AggregateKind::Max, field, alias);
        self
    }

    pub fn count(mut self, alias: impl Into<String>) -> Self {
        self.add_aggregate(AggregateKind::Count, FieldExpr::Named(String::new()), alias);
        self
    }

    pub fn calculate<F>(mut self, alias: impl Into<String>, func: F) -> Self
    where
        F: Fn(&GroupContext) -> Value + Send + Sync + 'static,
    {
        self.add_calculation(alias, func);
        self
    }
}

// ============================================================================
// COLUMNS
// ============================================================================

/// Display rule a sink applies when printing a column's values.
///
/// The engine never interprets these; they ride along on the definition for
/// whichever sink wants them.
#[derive(Clone)]
pub enum FormatRule {
    /// `$` prefix, thousands separators, two decimals.
    Currency,
    /// Thousands separators, no decimals.
    Number,
    /// `Yes` / `No`.
    Boolean,
    /// ISO `YYYY-MM-DD` for parseable date text.
    Date,
    /// A strftime-style pattern applied to parseable date text.
    DateFormat(String),
    /// Caller-supplied formatting.
    Callback(Arc<dyn Fn(&Value) -> String + Send + Sync>),
}

impl fmt::Debug for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatRule::Currency => f.write_str("Currency"),
            FormatRule::Number => f.write_str("Number"),
            FormatRule::Boolean => f.write_str("Boolean"),
            FormatRule::Date => f.write_str("Date"),
            FormatRule::DateFormat(pattern) => f.debug_tuple("DateFormat").field(pattern).finish(),
            FormatRule::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Display metadata for one detail column.
#[derive(Debug, Clone)]
pub struct Column {
    /// Record field the column reads.
    pub field: String,
    /// Heading text.
    pub label: String,
    pub format: Option<FormatRule>,
}

impl Column {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Column {
            field: field.into(),
            label: label.into(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: FormatRule) -> Self {
        self.format = Some(format);
        self
    }
}

/// Ordered column configuration for the detail band.
///
/// Empty means "unconfigured": sinks fall back to echoing raw record fields.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    pub fn new() -> Self {
        ColumnSet::default()
    }

    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Configured fields in display order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.field.as_str())
    }

    /// Looks up the display label configured for a field.
    pub fn label_for(&self, field: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.label.as_str())
    }

    /// Looks up the format rule configured for a field, if any.
    pub fn format_for(&self, field: &str) -> Option<&FormatRule> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .and_then(|c| c.format.as_ref())
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// A fully configured report: group levels from outermost inward, plus the
/// detail column surface.
///
/// Running it lives in [`engine`](crate::engine); a `Report` itself is inert
/// configuration and can drive any number of passes.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub groups: Vec<GroupSpec>,
    pub columns: ColumnSet,
}
