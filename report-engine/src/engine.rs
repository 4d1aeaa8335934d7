//! FILENAME: report-engine/src/engine.rs
//! The control-break pass: one forward sweep over an ordered record stream.
//!
//! The engine never sorts and never buffers more than the current record
//! plus per-level accumulation state. Grouping is purely reactive: a group
//! exists exactly for the run of records whose key tokens repeat, so input
//! order is the caller's contract.
//!
//! Band ordering on a break is fixed: footers close inner-first down to the
//! break level, then headers open outer-first down to the innermost level,
//! and only then is the record accumulated and its detail band emitted.
//! Headers therefore always see a fresh context (count zero, first record
//! set), footers always see a finished one.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

use crate::aggregate::Accumulator;
use crate::band::{BandContext, BandKind, BandSink};
use crate::builder::ReportBuilder;
use crate::context::{ContextValues, GroupContext};
use crate::definition::{GroupSpec, Report};
use crate::error::ReportError;
use crate::record::Record;
use crate::source::RecordSource;

/// Key vectors are as deep as the group nesting, which is rarely more than
/// a handful of levels.
type KeyVec = SmallVec<[String; 4]>;

// ============================================================================
// BREAK DETECTION
// ============================================================================

/// Index of the outermost level at which two key vectors differ, or `None`
/// when they are identical.
///
/// A single index is the whole contract: a difference at level N invalidates
/// every level deeper than N, because an inner group is only "the same
/// group" while all its ancestor keys also still match. Length mismatch
/// (the first record of a pass) breaks at the end of the shorter vector.
fn break_level(previous: &[String], current: &[String]) -> Option<usize> {
    let first_diff = previous.iter().zip(current).position(|(p, c)| p != c);
    match first_diff {
        Some(level) => Some(level),
        None if previous.len() != current.len() => {
            Some(previous.len().min(current.len()))
        }
        None => None,
    }
}

// ============================================================================
// PASS STATE
// ============================================================================

/// Live accumulation state for one open group instance.
struct GroupState {
    /// Comparison token this instance was opened under (kept for logs).
    key: String,
    first_record: Arc<Record>,
    last_record: Option<Arc<Record>>,
    record_count: u64,
    /// One accumulator per aggregate definition, in definition order.
    accumulators: Vec<Accumulator>,
}

impl GroupState {
    fn open(spec: &GroupSpec, record: &Arc<Record>, key: String) -> Self {
        GroupState {
            key,
            first_record: Arc::clone(record),
            last_record: None,
            record_count: 0,
            accumulators: spec.aggregates.iter().map(Accumulator::for_spec).collect(),
        }
    }

    fn absorb(&mut self, record: &Arc<Record>) {
        for acc in &mut self.accumulators {
            acc.accumulate(record);
        }
        self.record_count += 1;
        self.last_record = Some(Arc::clone(record));
    }
}

/// Report-wide accumulators, one per aggregate alias across all levels,
/// fed by every record and never reset at group boundaries. They back the
/// summary band's grand totals.
#[derive(Default)]
struct ReportAggregates {
    by_alias: IndexMap<String, Accumulator, FxBuildHasher>,
}

impl ReportAggregates {
    fn absorb(&mut self, groups: &[GroupSpec], record: &Record) {
        // Materialize missing aliases first (declaration order, first
        // declaration wins), then feed each alias exactly once.
        for spec in groups {
            for def in &spec.aggregates {
                if !self.by_alias.contains_key(&def.alias) {
                    self.by_alias
                        .insert(def.alias.clone(), Accumulator::for_spec(def));
                }
            }
        }
        for acc in self.by_alias.values_mut() {
            acc.accumulate(record);
        }
    }

    fn summary_context(&self, record_count: u64) -> GroupContext {
        let mut ctx = GroupContext {
            record_count,
            ..GroupContext::default()
        };
        for (alias, acc) in &self.by_alias {
            ctx.values.insert(alias.clone(), acc.value_as_value());
        }
        ctx
    }
}

/// State for one pass. Built fresh inside the run entry points and dropped
/// when the pass ends, so a `Report` can drive any number of passes.
struct ReportPass<'a> {
    report: &'a Report,
    sink: &'a mut dyn BandSink,
    previous_keys: KeyVec,
    /// Stack of open groups, index = nesting level.
    open_groups: Vec<GroupState>,
    report_aggregates: ReportAggregates,
    record_count: u64,
}

impl<'a> ReportPass<'a> {
    fn new(report: &'a Report, sink: &'a mut dyn BandSink) -> Self {
        ReportPass {
            report,
            sink,
            previous_keys: KeyVec::new(),
            open_groups: Vec::with_capacity(report.groups.len()),
            report_aggregates: ReportAggregates::default(),
            record_count: 0,
        }
    }

    fn run<I: Iterator<Item = Record>>(&mut self, records: I) {
        self.sink.render_band(
            BandKind::ReportHeader,
            None,
            BandContext::Columns(&self.report.columns),
        );

        for record in records {
            let record = Arc::new(record);
            let current_keys = self.extract_keys(&record);

            if let Some(level) = break_level(&self.previous_keys, &current_keys) {
                self.close_down_to(level);
                self.open_from(level, &record, &current_keys);
            }

            self.absorb(&record);
            self.sink
                .render_band(BandKind::Detail, None, BandContext::Record(&record));
            self.previous_keys = current_keys;
        }

        // End of stream closes everything still open, inner-first.
        self.close_down_to(0);

        let summary = self.report_aggregates.summary_context(self.record_count);
        self.sink
            .render_band(BandKind::Summary, None, BandContext::Group(&summary));
        self.sink.render_band(
            BandKind::ReportFooter,
            None,
            BandContext::Columns(&self.report.columns),
        );

        debug!(
            "report pass complete: {} records, {} group levels",
            self.record_count,
            self.report.groups.len()
        );
    }

    /// Evaluates every level's key expression on one record and reduces the
    /// results to comparison tokens. Read-only: safe to call any number of
    /// times for the same record.
    fn extract_keys(&self, record: &Record) -> KeyVec {
        self.report
            .groups
            .iter()
            .map(|g| g.key.extract(record).key_token())
            .collect()
    }

    /// Closes open groups deepest-first until only `level` levels remain.
    fn close_down_to(&mut self, level: usize) {
        while self.open_groups.len() > level {
            let closing = self.open_groups.len() - 1;
            let context = self.context_at(closing);
            if let Some(state) = self.open_groups.last() {
                debug!(
                    "group close: level={} key={:?} records={}",
                    closing, state.key, state.record_count
                );
            }
            self.sink
                .render_band(BandKind::GroupFooter, Some(closing), BandContext::Group(&context));
            self.open_groups.pop();
        }
    }

    /// Opens groups outer-first from `from` through the innermost level.
    /// A break at an outer level always reopens everything below it.
    fn open_from(&mut self, from: usize, record: &Arc<Record>, keys: &[String]) {
        for level in from..self.report.groups.len() {
            let spec = &self.report.groups[level];
            let key = keys.get(level).cloned().unwrap_or_default();
            debug!("group open: level={} key={:?}", level, key);
            self.open_groups.push(GroupState::open(spec, record, key));

            let context = self.context_at(level);
            self.sink
                .render_band(BandKind::GroupHeader, Some(level), BandContext::Group(&context));
        }
    }

    fn absorb(&mut self, record: &Arc<Record>) {
        for state in &mut self.open_groups {
            state.absorb(record);
        }
        self.report_aggregates.absorb(&self.report.groups, record);
        self.record_count += 1;
        trace!("record {} absorbed", self.record_count);
    }

    /// Context snapshot for the group open at `level`. A level with no open
    /// group yields an empty context rather than panicking, so a misdirected
    /// lookup degrades to blank output.
    fn context_at(&self, level: usize) -> GroupContext {
        match self.open_groups.get(level) {
            Some(state) => group_context(&self.report.groups[level], state),
            None => GroupContext::default(),
        }
    }
}

/// Assembles the band-visible snapshot for one open group: records and
/// count, aggregate values under their aliases, then calculations evaluated
/// in declaration order against the context built so far.
fn group_context(spec: &GroupSpec, state: &GroupState) -> GroupContext {
    let mut ctx = GroupContext {
        first_record: Some(Arc::clone(&state.first_record)),
        last_record: state.last_record.clone(),
        record_count: state.record_count,
        group_value: Some(spec.key.extract(&state.first_record)),
        values: ContextValues::default(),
    };
    for (def, acc) in spec.aggregates.iter().zip(&state.accumulators) {
        ctx.values.insert(def.alias.clone(), acc.value_as_value());
    }
    for calc in &spec.calculations {
        let value = (calc.func)(&ctx);
        ctx.values.insert(calc.alias.clone(), value);
    }
    ctx
}

// ============================================================================
// RUN ENTRY POINTS
// ============================================================================

impl Report {
    /// Starts a fluent [`ReportBuilder`].
    pub fn builder() -> ReportBuilder {
        ReportBuilder::new()
    }

    /// Runs one full pass: pulls the record stream from `source` and drives
    /// `sink` through the complete band sequence.
    ///
    /// The only failure point is the source hand-off; once records flow the
    /// pass cannot fail.
    pub fn run(
        &self,
        source: &mut dyn RecordSource,
        sink: &mut dyn BandSink,
    ) -> Result<(), ReportError> {
        let records = source.records()?;
        ReportPass::new(self, sink).run(records);
        Ok(())
    }

    /// Runs one full pass over an already-materialized record sequence.
    pub fn run_records<I>(&self, records: I, sink: &mut dyn BandSink)
    where
        I: IntoIterator<Item = Record>,
    {
        ReportPass::new(self, sink).run(records.into_iter());
    }

    /// Convenience: run against `source` and hand back the sink's output.
    pub fn render(
        &self,
        source: &mut dyn RecordSource,
        sink: &mut dyn BandSink,
    ) -> Result<String, ReportError> {
        self.run(source, sink)?;
        Ok(sink.output())
    }
}
