//! FILENAME: tests/test_html_table.rs
//! Full HTML documents rendered off real passes.

mod common;

use common::{customer_records, inventory_records, inventory_source};
use report_engine::{FormatRule, Report};
use report_render::HtmlTableRenderer;

fn inventory_report() -> Report {
    Report::builder()
        .group_by("category")
        .sum("amount", "categoryTotal")
        .column("product", "Product Name")
        .formatted_column("amount", "Amount ($)", FormatRule::Currency)
        .formatted_column("active", "Active", FormatRule::Boolean)
        .formatted_column("created_at", "Created", FormatRule::DateFormat("%b %-d, %Y".to_string()))
        .column("category", "Category")
        .build()
        .unwrap()
}

#[test]
fn test_document_structure() {
    let mut sink = HtmlTableRenderer::new();
    let html = inventory_report()
        .render(&mut inventory_source(), &mut sink)
        .unwrap();

    assert!(html.contains("<h1>Report Title</h1>"));
    assert!(html.contains("<table class=\"report-table\">"));
    assert!(html.contains("<thead>"));
    assert!(html.contains("<tfoot>"));
    assert!(html.trim_end().ends_with(
        "<p class=\"report-footer\">Report generated by ReportWriter</p>"
    ));

    // One tbody per outermost group.
    assert_eq!(html.matches("<tbody>").count(), 2);
    assert_eq!(html.matches("</tbody>").count(), 2);
}

#[test]
fn test_column_headings_in_order() {
    let mut sink = HtmlTableRenderer::new();
    let html = inventory_report()
        .render(&mut inventory_source(), &mut sink)
        .unwrap();

    assert!(html.contains("<th>Product Name</th>"));
    assert!(html.contains("<th>Amount ($)</th>"));
    assert!(html.contains("<th>Active</th>"));
    assert!(html.contains("<th>Created</th>"));
    assert!(html.contains("<th>Category</th>"));

    let product = html.find("<th>Product Name</th>").unwrap();
    let category = html.find("<th>Category</th>").unwrap();
    assert!(product < category);
}

#[test]
fn test_format_rules_applied_to_cells() {
    let mut sink = HtmlTableRenderer::new();
    let html = inventory_report()
        .render(&mut inventory_source(), &mut sink)
        .unwrap();

    assert!(html.contains("<td>$1,234.50</td>"));
    assert!(html.contains("<td>$987.65</td>"));
    assert!(html.contains("<td>$500.00</td>"));
    assert!(html.contains("<td>Yes</td>"));
    assert!(html.contains("<td>No</td>"));
    assert!(html.contains("<td>Jan 15, 2025</td>"));
    assert!(html.contains("<td>Mar 1, 2025</td>"));
}

#[test]
fn test_group_rows_and_totals() {
    let mut sink = HtmlTableRenderer::new();
    let html = inventory_report()
        .render(&mut inventory_source(), &mut sink)
        .unwrap();

    assert!(html.contains("<td colspan=\"5\"><strong>Group: A</strong></td>"));
    assert!(html.contains("<td colspan=\"5\"><strong>Group: B</strong></td>"));

    // Category A: 1234.50 + 987.65; category B: 500.
    assert!(html.contains("<td colspan=\"4\"><strong>Total for group</strong></td><td>2,222.15</td>"));
    assert!(html.contains("<td colspan=\"4\"><strong>Total for group</strong></td><td>500.00</td>"));

    // Grand total across both groups.
    assert!(html.contains("2,722.15"));
    assert!(html.contains("Grand total (3 records)"));
}

#[test]
fn test_custom_title_is_escaped() {
    let mut sink = HtmlTableRenderer::new().with_title("Q1 <Sales> & Returns");
    let html = inventory_report()
        .render(&mut inventory_source(), &mut sink)
        .unwrap();

    assert!(html.contains("<h1>Q1 &lt;Sales&gt; &amp; Returns</h1>"));
}

#[test]
fn test_unconfigured_columns_echo_raw_fields() {
    let report = Report::builder().build().unwrap();

    let mut sink = HtmlTableRenderer::new();
    report.run_records(customer_records(), &mut sink);
    let html = sink.output();

    assert!(!html.contains("<thead>"));
    assert!(html.contains("<td>Alice</td>"));
    assert!(html.contains("<td>100.5</td>"));
    // Ungrouped details still sit inside a tbody.
    assert_eq!(html.matches("<tbody>").count(), 1);
    assert!(html.contains("3 records"));
}

#[test]
fn test_nested_groups_render_level_classes() {
    let report = Report::builder()
        .group_by("category")
        .sum("amount", "outerTotal")
        .group_by("product")
        .sum("amount", "innerTotal")
        .column("product", "Product")
        .column("amount", "Amount")
        .build()
        .unwrap();

    let mut sink = HtmlTableRenderer::new();
    report.run_records(inventory_records(), &mut sink);
    let html = sink.output();

    assert!(html.contains("class=\"group-header\""));
    assert!(html.contains("class=\"group-header level-1\""));
    assert!(html.contains("class=\"group-footer level-1\""));
    // Outermost tbody count still tracks the outer level only.
    assert_eq!(html.matches("<tbody>").count(), 2);
}

#[test]
fn test_output_drains() {
    let mut sink = HtmlTableRenderer::new();
    let html = inventory_report()
        .render(&mut inventory_source(), &mut sink)
        .unwrap();

    assert!(!html.is_empty());
    assert!(sink.output().is_empty());
}
