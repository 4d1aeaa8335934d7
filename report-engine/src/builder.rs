//! FILENAME: report-engine/src/builder.rs
//! Fluent report construction.
//!
//! Aggregates, calculations and columns chain off the builder; aggregates
//! and calculations attach to the most recently declared group level.
//! Misuse (an aggregate before any `group_by`) is latched when it happens
//! and surfaced by [`build`](ReportBuilder::build), which keeps the chain
//! itself infallible.

use crate::context::GroupContext;
use crate::definition::{
    AggregateKind, Column, ColumnSet, FieldExpr, FormatRule, GroupSpec, Report,
};
use crate::error::ReportError;
use crate::value::Value;

/// Builds a [`Report`] one clause at a time.
///
/// ```
/// use report_engine::{Report, Value};
///
/// let report = Report::builder()
///     .group_by("year")
///     .sum("amount", "yearTotal")
///     .group_by("month")
///     .sum("amount", "monthTotal")
///     .calculate("share", |ctx| Value::from(ctx.number("monthTotal") / 100.0))
///     .column("month", "Month")
///     .column("amount", "Amount")
///     .build()
///     .unwrap();
/// assert_eq!(report.groups.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ReportBuilder {
    groups: Vec<GroupSpec>,
    columns: ColumnSet,
    misuse: Option<ReportError>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        ReportBuilder::default()
    }

    /// Adds the next (deeper) grouping level. Order of calls is nesting
    /// order: first call is the outermost level.
    pub fn group_by(mut self, key: impl Into<FieldExpr>) -> Self {
        self.groups.push(GroupSpec::new(key));
        self
    }

    /// Attaches an aggregate of `kind` to the current group level.
    pub fn aggregate(
        mut self,
        kind: AggregateKind,
        field: impl Into<FieldExpr>,
        alias: impl Into<String>,
    ) -> Self {
        match self.groups.last_mut() {
            Some(group) => group.add_aggregate(kind, field, alias),
            None => self.latch_misuse(),
        }
        self
    }

    pub fn sum(self, field: impl Into<FieldExpr>, alias: impl Into<String>) -> Self {
        self.aggregate(AggregateKind::Sum, field, alias)
    }

    pub fn avg(self, field: impl Into<FieldExpr>, alias: impl Into<String>) -> Self {
        self.aggregate(AggregateKind::Avg, field, alias)
    }

    pub fn min(self, field: impl Into<FieldExpr>, alias: impl Into<String>) -> Self {
        self.aggregate(AggregateKind::Min, field, alias)
    }

    pub fn max(self, field: impl Into<FieldExpr>, alias: impl Into<String>) -> Self {
        self.aggregate(AggregateKind::Max, field, alias)
    }

    /// Count takes no input field; every accumulated record counts.
    pub fn count(self, alias: impl Into<String>) -> Self {
        self.aggregate(
            AggregateKind::Count,
            FieldExpr::Named(String::new()),
            alias,
        )
    }

    /// Attaches a named calculation to the current group level. Calculations
    /// run when the group closes, in declaration order, each seeing the
    /// aggregates and all earlier calculations.
    pub fn calculate<F>(mut self, alias: impl Into<String>, func: F) -> Self
    where
        F: Fn(&GroupContext) -> Value + Send + Sync + 'static,
    {
        match self.groups.last_mut() {
            Some(group) => group.add_calculation(alias, func),
            None => self.latch_misuse(),
        }
        self
    }

    /// Adds a detail column with no format rule.
    pub fn column(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.columns.push(Column::new(field, label));
        self
    }

    /// Adds a detail column with a format rule.
    pub fn formatted_column(
        mut self,
        field: impl Into<String>,
        label: impl Into<String>,
        format: FormatRule,
    ) -> Self {
        self.columns.push(Column::new(field, label).with_format(format));
        self
    }

    /// Finishes the build. Any misuse latched along the chain surfaces here.
    pub fn build(self) -> Result<Report, ReportError> {
        if let Some(err) = self.misuse {
            return Err(err);
        }
        Ok(Report {
            groups: self.groups,
            columns: self.columns,
        })
    }

    /// First misuse wins; later clauses cannot un-latch it.
    fn latch_misuse(&mut self) {
        if self.misuse.is_none() {
            self.misuse = Some(ReportError::AggregateBeforeGroup);
        }
    }
}
