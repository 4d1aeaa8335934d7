//! FILENAME: tests/common/mod.rs
//! Recording sink and shared fixtures for report-engine integration tests.

#![allow(dead_code)]

use report_engine::{BandContext, BandKind, BandSink, GroupContext, Record};

/// One captured band event, with whatever payload the band carried.
pub struct CapturedBand {
    pub kind: BandKind,
    pub level: Option<usize>,
    pub group: Option<GroupContext>,
    pub record: Option<Record>,
}

impl CapturedBand {
    /// Order-assertion name: `groupHeader_0`, `detail`, `summary`.
    pub fn name(&self) -> String {
        match self.level {
            Some(level) => format!("{}_{}", self.kind, level),
            None => self.kind.to_string(),
        }
    }
}

/// Sink that records the full band sequence for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub bands: Vec<CapturedBand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink::default()
    }

    pub fn band_names(&self) -> Vec<String> {
        self.bands.iter().map(CapturedBand::name).collect()
    }

    /// Group contexts of every header at `level`, in emission order.
    pub fn headers(&self, level: usize) -> Vec<&GroupContext> {
        self.group_contexts(BandKind::GroupHeader, level)
    }

    /// Group contexts of every footer at `level`, in emission order.
    pub fn footers(&self, level: usize) -> Vec<&GroupContext> {
        self.group_contexts(BandKind::GroupFooter, level)
    }

    pub fn summary(&self) -> &GroupContext {
        self.bands
            .iter()
            .find(|b| b.kind == BandKind::Summary)
            .and_then(|b| b.group.as_ref())
            .expect("pass emitted no summary band")
    }

    pub fn details(&self) -> Vec<&Record> {
        self.bands
            .iter()
            .filter(|b| b.kind == BandKind::Detail)
            .filter_map(|b| b.record.as_ref())
            .collect()
    }

    fn group_contexts(&self, kind: BandKind, level: usize) -> Vec<&GroupContext> {
        self.bands
            .iter()
            .filter(|b| b.kind == kind && b.level == Some(level))
            .filter_map(|b| b.group.as_ref())
            .collect()
    }
}

impl BandSink for RecordingSink {
    fn render_band(&mut self, kind: BandKind, level: Option<usize>, context: BandContext<'_>) {
        let (group, record) = match context {
            BandContext::Group(ctx) => (Some(ctx.clone()), None),
            BandContext::Record(r) => (None, Some(r.clone())),
            BandContext::Columns(_) => (None, None),
        };
        self.bands.push(CapturedBand {
            kind,
            level,
            group,
            record,
        });
    }

    fn output(&mut self) -> String {
        format!("{} bands", self.bands.len())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Three categories-sorted sales rows: A 100, A 200, B 300.
pub fn category_sales() -> Vec<Record> {
    vec![
        Record::new().with("category", "A").with("amount", 100),
        Record::new().with("category", "A").with("amount", 200),
        Record::new().with("category", "B").with("amount", 300),
    ]
}

/// Catalog rows for exercising every aggregate kind at once.
pub fn catalog_sales() -> Vec<Record> {
    vec![
        Record::new().with("category", "Electronics").with("amount", 100),
        Record::new().with("category", "Electronics").with("amount", 200),
        Record::new().with("category", "Electronics").with("amount", 300),
        Record::new().with("category", "Books").with("amount", 30),
        Record::new().with("category", "Books").with("amount", 50),
    ]
}

/// Two-level fixture, sorted by year then month. January reappears under
/// 2025, so it exercises the outer-break cascade as well.
pub fn year_month_sales() -> Vec<Record> {
    vec![
        Record::new().with("year", 2024).with("month", "January").with("amount", 100),
        Record::new().with("year", 2024).with("month", "January").with("amount", 200),
        Record::new().with("year", 2024).with("month", "February").with("amount", 300),
        Record::new().with("year", 2025).with("month", "January").with("amount", 400),
    ]
}

/// The month key repeats across a year boundary: January appears in both
/// 2024 and 2025 back to back.
pub fn january_across_years() -> Vec<Record> {
    vec![
        Record::new().with("year", 2024).with("month", "January").with("amount", 100),
        Record::new().with("year", 2025).with("month", "January").with("amount", 200),
    ]
}
