//! FILENAME: report-engine/src/source.rs
//! Record sources: where report input comes from.
//!
//! The engine asks a source for its records exactly once per pass and
//! consumes the stream forward-only. Sources validate at their own boundary;
//! by the time records reach the engine they are just records.

use log::debug;

use crate::error::ReportError;
use crate::record::Record;

/// A finite, forward-only stream of records. Consumed by a single pass.
pub type RecordStream = Box<dyn Iterator<Item = Record>>;

/// Supplies the ordered records a report pass consumes.
///
/// Implementations decide how records are obtained (in-memory, query, file)
/// and fail here, at hand-off, rather than mid-pass.
pub trait RecordSource {
    fn records(&mut self) -> Result<RecordStream, ReportError>;
}

// ============================================================================
// ARRAY SOURCE
// ============================================================================

/// In-memory source over an already-materialized record list.
///
/// Single-use: the first [`records`](RecordSource::records) call moves the
/// data out, so a second pass over the same source sees an empty stream.
#[derive(Debug, Default)]
pub struct ArraySource {
    data: Vec<Record>,
}

impl ArraySource {
    pub fn new(data: Vec<Record>) -> Self {
        ArraySource { data }
    }

    /// Parses a JSON array of objects into records.
    ///
    /// Malformed input is rejected here; a report run never sees it.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let data: Vec<Record> = serde_json::from_str(json)
            .map_err(|e| ReportError::InvalidSource(e.to_string()))?;
        debug!("array source parsed {} records from JSON", data.len());
        Ok(ArraySource::new(data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl RecordSource for ArraySource {
    fn records(&mut self) -> Result<RecordStream, ReportError> {
        Ok(Box::new(std::mem::take(&mut self.data).into_iter()))
    }
}

// ============================================================================
// QUERY SOURCE
// ============================================================================

type QueryFn = Box<dyn FnMut() -> RecordStream>;

/// Deferred source: holds a query closure and executes it only when the
/// report actually runs.
///
/// Asking an unconfigured `QuerySource` for records is a hard error
/// ([`ReportError::NoQueryConfigured`]), surfaced at request time so that a
/// half-built report fails loudly instead of rendering an empty document.
#[derive(Default)]
pub struct QuerySource {
    query: Option<QueryFn>,
}

impl QuerySource {
    pub fn new() -> Self {
        QuerySource { query: None }
    }

    /// Installs the query to run. The closure is invoked once per report
    /// pass, so re-running the report re-executes the query.
    pub fn with_query<F, I>(mut self, mut query: F) -> Self
    where
        F: FnMut() -> I + 'static,
        I: IntoIterator<Item = Record>,
        I::IntoIter: 'static,
    {
        self.query = Some(Box::new(move || Box::new(query().into_iter())));
        self
    }
}

impl RecordSource for QuerySource {
    fn records(&mut self) -> Result<RecordStream, ReportError> {
        match self.query.as_mut() {
            Some(query) => {
                debug!("query source executing deferred query");
                Ok(query())
            }
            None => Err(ReportError::NoQueryConfigured),
        }
    }
}
