//! FILENAME: report-engine/src/lib.rs
//! Control-break reporting engine.
//!
//! Turns a flat, pre-ordered record stream into a banded report in a single
//! forward pass: group boundaries are detected as key changes, aggregates
//! accumulate per open group, and every structural event (headers, details,
//! footers, summary) is pushed through a pluggable [`BandSink`].
//!
//! Layers:
//! - `definition`: What the report IS (group levels, aggregates, columns)
//! - `source`: Where records come from (in-memory, deferred query)
//! - `engine`: The single-pass control-break sweep (HOW we compute)
//! - `band` / `context`: What sinks receive (WHAT we emit)
//!
//! The engine emits structure, never markup; rendering belongs to sinks
//! such as the ones in the companion `report-render` crate.

pub mod aggregate;
pub mod band;
pub mod builder;
pub mod context;
pub mod definition;
pub mod engine;
pub mod error;
pub mod record;
pub mod source;
pub mod value;

pub use aggregate::Accumulator;
pub use band::{BandContext, BandKind, BandSink};
pub use builder::ReportBuilder;
pub use context::{ContextValues, GroupContext};
pub use definition::{
    AggregateKind, AggregateSpec, CalculationFn, CalculationSpec, Column, ColumnSet, FieldExpr,
    FormatRule, GroupSpec, Report,
};
pub use error::ReportError;
pub use record::{FieldMap, Record};
pub use source::{ArraySource, QuerySource, RecordSource, RecordStream};
pub use value::Value;
