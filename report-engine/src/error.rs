//! FILENAME: report-engine/src/error.rs
//! Error types for report configuration and record sourcing.
//!
//! The band-emission pass itself is infallible: once a report builds and its
//! source yields a stream, rendering cannot fail. Everything that can go
//! wrong does so at the edges, and lands in [`ReportError`].

use thiserror::Error;

/// Errors surfaced while configuring a report or pulling its records.
#[derive(Error, Debug)]
pub enum ReportError {
    /// An aggregate name did not match any supported kind.
    #[error("unknown aggregate kind: '{0}' (expected sum, avg, min, max or count)")]
    UnknownAggregate(String),

    /// An aggregate or calculation was attached before any group level
    /// existed to receive it.
    #[error("no group level defined: call group_by() before adding aggregates or calculations")]
    AggregateBeforeGroup,

    /// A deferred source was asked for records without a query installed.
    #[error("no query configured: install one with with_query() before running the report")]
    NoQueryConfigured,

    /// Raw source input (JSON text, typically) could not be turned into records.
    #[error("invalid source data: {0}")]
    InvalidSource(String),
}
