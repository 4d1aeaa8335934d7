//! FILENAME: report-render/src/html.rs
//! HTML table sink: one self-contained fragment per report pass.
//!
//! Layout: `<h1>` title, one `<table class="report-table">` with a `<thead>`
//! built from the configured columns, one `<tbody>` per outermost group
//! (group header and footer rows ride inside it), and a `<tfoot>` for the
//! report summary. Without configured columns the sink echoes raw record
//! fields, so an unconfigured report still renders.

use log::warn;

use report_engine::{BandContext, BandKind, BandSink, ColumnSet, GroupContext, Record, Value};

use crate::format::{format_number, format_value};

/// Renders the band stream as an HTML table document.
pub struct HtmlTableRenderer {
    title: String,
    columns: ColumnSet,
    out: String,
    tbody_open: bool,
}

impl HtmlTableRenderer {
    pub fn new() -> Self {
        HtmlTableRenderer {
            title: "Report Title".to_string(),
            columns: ColumnSet::new(),
            out: String::new(),
            tbody_open: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn open_report(&mut self) {
        self.out.push_str(&format!("<h1>{}</h1>\n", escape(&self.title)));
        self.out.push_str("<table class=\"report-table\">\n");

        if !self.columns.is_empty() {
            self.out.push_str("<thead>\n<tr>");
            for column in &self.columns {
                self.out
                    .push_str(&format!("<th>{}</th>", escape(&column.label)));
            }
            self.out.push_str("</tr>\n</thead>\n");
        }
    }

    fn group_header_row(&mut self, level: usize, ctx: &GroupContext) {
        if level == 0 {
            self.close_tbody();
            self.open_tbody();
        } else {
            self.ensure_tbody();
        }

        let value = ctx
            .group_value
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default();
        let class = row_class("group-header", level);
        self.out.push_str(&format!(
            "<tr class=\"{}\"><td{}><strong>Group: {}</strong></td></tr>\n",
            class,
            span_attr(self.columns.len()),
            escape(&value)
        ));
    }

    fn detail_row(&mut self, record: &Record) {
        self.ensure_tbody();
        self.out.push_str("<tr>");
        if self.columns.is_empty() {
            for (_, value) in record.fields() {
                self.out
                    .push_str(&format!("<td>{}</td>", escape(&value.to_string())));
            }
        } else {
            for column in &self.columns {
                let value = record.get(&column.field).unwrap_or(&Value::Null);
                let text = format_value(value, column.format.as_ref());
                self.out.push_str(&format!("<td>{}</td>", escape(&text)));
            }
        }
        self.out.push_str("</tr>\n");
    }

    fn group_footer_row(&mut self, level: usize, ctx: &GroupContext) {
        let class = row_class("group-footer", level);
        let label_span = span_attr(self.columns.len().saturating_sub(1));

        // The footer total cell shows the level's first aggregate; a level
        // with no aggregates falls back to its record count.
        let total = match ctx.values.get_index(0) {
            Some((_, value)) => format_number(value.coerce_f64(), 2),
            None => ctx.record_count.to_string(),
        };
        self.out.push_str(&format!(
            "<tr class=\"{}\"><td{}><strong>Total for group</strong></td><td>{}</td></tr>\n",
            class, label_span, total
        ));

        if level == 0 {
            self.close_tbody();
        }
    }

    fn summary_rows(&mut self, ctx: &GroupContext) {
        self.close_tbody();
        self.out.push_str("<tfoot>\n");
        match ctx.values.get_index(0) {
            Some((_, value)) => {
                self.out.push_str(&format!(
                    "<tr class=\"report-summary\"><td{}><strong>Grand total ({} records)</strong></td><td><strong>{}</strong></td></tr>\n",
                    span_attr(self.columns.len().saturating_sub(1)),
                    ctx.record_count,
                    format_number(value.coerce_f64(), 2)
                ));
            }
            None => {
                self.out.push_str(&format!(
                    "<tr class=\"report-summary\"><td{}><strong>{} records</strong></td></tr>\n",
                    span_attr(self.columns.len()),
                    ctx.record_count
                ));
            }
        }
        self.out.push_str("</tfoot>\n");
    }

    fn close_report(&mut self) {
        self.close_tbody();
        self.out.push_str("</table>\n");
        self.out
            .push_str("<p class=\"report-footer\">Report generated by ReportWriter</p>\n");
    }

    fn open_tbody(&mut self) {
        self.out.push_str("<tbody>\n");
        self.tbody_open = true;
    }

    fn ensure_tbody(&mut self) {
        if !self.tbody_open {
            self.open_tbody();
        }
    }

    fn close_tbody(&mut self) {
        if self.tbody_open {
            self.out.push_str("</tbody>\n");
            self.tbody_open = false;
        }
    }
}

impl Default for HtmlTableRenderer {
    fn default() -> Self {
        HtmlTableRenderer::new()
    }
}

impl BandSink for HtmlTableRenderer {
    fn render_band(&mut self, kind: BandKind, level: Option<usize>, context: BandContext<'_>) {
        match (kind, context) {
            (BandKind::ReportHeader, BandContext::Columns(columns)) => {
                self.columns = columns.clone();
                self.open_report();
            }
            (BandKind::ReportHeader, _) => self.open_report(),
            (BandKind::GroupHeader, BandContext::Group(ctx)) => {
                self.group_header_row(level.unwrap_or(0), ctx)
            }
            (BandKind::Detail, BandContext::Record(record)) => self.detail_row(record),
            (BandKind::GroupFooter, BandContext::Group(ctx)) => {
                self.group_footer_row(level.unwrap_or(0), ctx)
            }
            (BandKind::Summary, BandContext::Group(ctx)) => self.summary_rows(ctx),
            (BandKind::ReportFooter, _) => self.close_report(),
            (kind, _) => warn!("html sink: unexpected payload for {} band", kind),
        }
    }

    /// Drains the accumulated document.
    fn output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

fn row_class(base: &str, level: usize) -> String {
    if level == 0 {
        base.to_string()
    } else {
        format!("{} level-{}", base, level)
    }
}

/// `colspan` attribute text, omitted when it would not widen the cell.
fn span_attr(span: usize) -> String {
    if span > 1 {
        format!(" colspan=\"{}\"", span)
    } else {
        String::new()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
