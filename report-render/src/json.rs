//! FILENAME: report-render/src/json.rs
//! JSON document sink: the full report as one machine-readable tree.
//!
//! Shape:
//! ```json
//! {
//!   "metadata": { "generatedAt": "..." },
//!   "columns":  [ { "field": "...", "label": "...", "format": null } ],
//!   "groups":   [ { "level": 0, "value": ..., "aggregates": {...},
//!                   "rows": [...], "subgroups": [...] } ],
//!   "summary":  { "recordCount": 0, "aggregates": {...} }
//! }
//! ```
//! Grouped reports nest via `subgroups`; an ungrouped report puts its
//! formatted rows directly into `groups`. Detail cells are the formatted
//! display strings, matching what the table sinks print.

use chrono::{SecondsFormat, Utc};
use log::{error, warn};
use serde_json::{json, Map, Value as Json};

use report_engine::{
    BandContext, BandKind, BandSink, ColumnSet, FormatRule, GroupContext, Record, Value,
};

use crate::format::format_value;

/// One group being assembled while its bands are still streaming in.
struct GroupNode {
    level: usize,
    value: Json,
    rows: Vec<Json>,
    subgroups: Vec<Json>,
}

impl GroupNode {
    fn finish(self, ctx: &GroupContext) -> Json {
        json!({
            "level": self.level,
            "value": self.value,
            "aggregates": aggregates_json(ctx),
            "rows": self.rows,
            "subgroups": self.subgroups,
        })
    }
}

/// Renders the band stream as a pretty-printed JSON document.
pub struct JsonRenderer {
    columns: ColumnSet,
    generated_at: Option<String>,
    /// Finished outermost groups, or flat rows when nothing is grouped.
    groups: Vec<Json>,
    /// Open groups, outermost first. Details land in the deepest entry.
    stack: Vec<GroupNode>,
    summary: Json,
}

impl JsonRenderer {
    pub fn new() -> Self {
        JsonRenderer {
            columns: ColumnSet::new(),
            generated_at: None,
            groups: Vec::new(),
            stack: Vec::new(),
            summary: Json::Null,
        }
    }

    fn open_group(&mut self, level: usize, ctx: &GroupContext) {
        let value = ctx
            .group_value
            .as_ref()
            .map(value_json)
            .unwrap_or(Json::Null);
        self.stack.push(GroupNode {
            level,
            value,
            rows: Vec::new(),
            subgroups: Vec::new(),
        });
    }

    fn close_group(&mut self, ctx: &GroupContext) {
        let Some(node) = self.stack.pop() else {
            warn!("json sink: group footer with no open group");
            return;
        };
        let finished = node.finish(ctx);
        match self.stack.last_mut() {
            Some(parent) => parent.subgroups.push(finished),
            None => self.groups.push(finished),
        }
    }

    fn push_row(&mut self, record: &Record) {
        let row = self.format_row(record);
        match self.stack.last_mut() {
            Some(node) => node.rows.push(row),
            // No grouping configured: rows sit directly under "groups".
            None => self.groups.push(row),
        }
    }

    /// A detail row as an object of display strings, keyed by column field.
    /// Without configured columns the raw record is embedded instead.
    fn format_row(&self, record: &Record) -> Json {
        if self.columns.is_empty() {
            return serde_json::to_value(record).unwrap_or(Json::Null);
        }
        let mut row = Map::new();
        for column in &self.columns {
            let value = record.get(&column.field).unwrap_or(&Value::Null);
            row.insert(
                column.field.clone(),
                Json::String(format_value(value, column.format.as_ref())),
            );
        }
        Json::Object(row)
    }

    fn columns_json(&self) -> Json {
        let entries: Vec<Json> = self
            .columns
            .into_iter()
            .map(|column| {
                json!({
                    "field": column.field.clone(),
                    "label": column.label.clone(),
                    "format": column.format.as_ref().map(format_name),
                })
            })
            .collect();
        Json::Array(entries)
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        JsonRenderer::new()
    }
}

impl BandSink for JsonRenderer {
    fn render_band(&mut self, kind: BandKind, level: Option<usize>, context: BandContext<'_>) {
        match (kind, context) {
            (BandKind::ReportHeader, BandContext::Columns(columns)) => {
                self.columns = columns.clone();
                self.generated_at =
                    Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false));
            }
            (BandKind::ReportHeader, _) => {
                self.generated_at =
                    Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false));
            }
            (BandKind::GroupHeader, BandContext::Group(ctx)) => {
                self.open_group(level.unwrap_or(0), ctx)
            }
            (BandKind::Detail, BandContext::Record(record)) => self.push_row(record),
            (BandKind::GroupFooter, BandContext::Group(ctx)) => self.close_group(ctx),
            (BandKind::Summary, BandContext::Group(ctx)) => {
                self.summary = json!({
                    "recordCount": ctx.record_count,
                    "aggregates": aggregates_json(ctx),
                });
            }
            (BandKind::ReportFooter, _) => {}
            (kind, _) => warn!("json sink: unexpected payload for {} band", kind),
        }
    }

    fn output(&mut self) -> String {
        let document = json!({
            "metadata": {
                "generatedAt": self.generated_at.take().unwrap_or_default(),
            },
            "columns": self.columns_json(),
            "groups": std::mem::take(&mut self.groups),
            "summary": std::mem::take(&mut self.summary),
        });
        match serde_json::to_string_pretty(&document) {
            Ok(text) => text,
            Err(err) => {
                error!("json sink: document serialization failed: {}", err);
                "{}".to_string()
            }
        }
    }
}

/// Aggregates (and calculations) of a context as an ordered JSON object.
fn aggregates_json(ctx: &GroupContext) -> Json {
    let mut out = Map::new();
    for (alias, value) in &ctx.values {
        out.insert(alias.clone(), value_json(value));
    }
    Json::Object(out)
}

fn value_json(value: &Value) -> Json {
    serde_json::to_value(value).unwrap_or(Json::Null)
}

/// Document spelling of a format rule.
fn format_name(rule: &FormatRule) -> String {
    match rule {
        FormatRule::Currency => "currency".to_string(),
        FormatRule::Number => "number".to_string(),
        FormatRule::Boolean => "boolean".to_string(),
        FormatRule::Date => "date".to_string(),
        FormatRule::DateFormat(pattern) => format!("date:{}", pattern),
        FormatRule::Callback(_) => "callback".to_string(),
    }
}
