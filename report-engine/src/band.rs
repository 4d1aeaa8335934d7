//! FILENAME: report-engine/src/band.rs
//! The band protocol between the engine and its sinks.
//!
//! A report pass is one ordered sequence of band events. Sinks are plain
//! state machines over that sequence; the engine neither knows nor cares
//! what they produce.

use std::fmt;

use crate::context::GroupContext;
use crate::definition::ColumnSet;
use crate::record::Record;

// ============================================================================
// BAND KINDS
// ============================================================================

/// The six structural band types, in the order a pass can emit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandKind {
    /// Exactly once, before any record.
    ReportHeader,
    /// A group instance opened at some level.
    GroupHeader,
    /// One input record.
    Detail,
    /// A group instance closed at some level.
    GroupFooter,
    /// Report-wide totals, after the last footer.
    Summary,
    /// Exactly once, last.
    ReportFooter,
}

impl BandKind {
    /// Wire/document name of the band, as sinks and logs spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            BandKind::ReportHeader => "reportHeader",
            BandKind::GroupHeader => "groupHeader",
            BandKind::Detail => "detail",
            BandKind::GroupFooter => "groupFooter",
            BandKind::Summary => "summary",
            BandKind::ReportFooter => "reportFooter",
        }
    }
}

impl fmt::Display for BandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BAND PAYLOADS
// ============================================================================

/// Payload carried by a band event. Borrowed from the pass; a sink that
/// needs data beyond the call clones what it keeps.
#[derive(Debug, Clone, Copy)]
pub enum BandContext<'a> {
    /// Report header and footer: the configured column surface.
    Columns(&'a ColumnSet),
    /// Group headers, group footers and the summary.
    Group(&'a GroupContext),
    /// Detail: the raw record.
    Record(&'a Record),
}

// ============================================================================
// SINK
// ============================================================================

/// Consumes band events and accumulates output.
///
/// `render_band` is infallible on purpose: by the time bands flow, all
/// input validation has happened. A sink that hits trouble degrades its own
/// output rather than aborting the pass.
pub trait BandSink {
    /// Handles one band. `level` is the group nesting depth for group
    /// headers and footers (0 = outermost) and `None` for the rest.
    fn render_band(&mut self, kind: BandKind, level: Option<usize>, context: BandContext<'_>);

    /// Final rendered output, called once after the pass completes.
    fn output(&mut self) -> String;
}
