//! FILENAME: report-render/src/format.rs
//! Display formatting shared by the built-in sinks.
//!
//! Formatting never fails: a rule that does not apply to a value (currency
//! on a word, date on a number) falls back to the value's plain display
//! form, so one odd cell degrades instead of breaking the document.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime};
use report_engine::{FormatRule, Value};

/// Formats one value for display under an optional column rule.
pub fn format_value(value: &Value, rule: Option<&FormatRule>) -> String {
    let Some(rule) = rule else {
        return value.to_string();
    };

    match rule {
        FormatRule::Currency => match numeric(value) {
            Some(n) => format!("${}", format_number(n, 2)),
            None => value.to_string(),
        },
        FormatRule::Number => match numeric(value) {
            Some(n) => format_number(n, 0),
            None => value.to_string(),
        },
        FormatRule::Boolean => if truthy(value) { "Yes" } else { "No" }.to_string(),
        FormatRule::Date => format_date(value, "%Y-%m-%d"),
        FormatRule::DateFormat(pattern) => format_date(value, pattern),
        FormatRule::Callback(f) => f(value),
    }
}

/// Fixed-decimal rendering with thousands separators: `1234.5` at two
/// decimals becomes `1,234.50`.
pub fn format_number(value: f64, decimals: usize) -> String {
    add_thousands_separators(&format!("{:.*}", decimals, value))
}

/// Numeric reading of a value for number-shaped rules. Stricter than
/// aggregation coercion: only actual numbers and numeric text qualify,
/// everything else keeps its plain form.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Loose truthiness for the Yes/No rule: null, false, zero, empty text and
/// empty arrays read as No.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        Value::Text(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
    }
}

fn format_date(value: &Value, pattern: &str) -> String {
    let Value::Text(text) = value else {
        return value.to_string();
    };
    let Some(datetime) = parse_date(text.trim()) else {
        return text.clone();
    };

    // DelayedFormat only reports a bad pattern (or a component a naive
    // datetime cannot supply, like %z) at display time, and to_string would
    // panic on that error. Render through write! and fall back to the raw
    // text instead.
    let mut out = String::new();
    match write!(out, "{}", datetime.format(pattern)) {
        Ok(()) => out,
        Err(_) => text.clone(),
    }
}

/// Dates without a time component read as midnight, so time specifiers in a
/// custom pattern still format.
fn parse_date(text: &str) -> Option<NaiveDateTime> {
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(datetime);
        }
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0)
}

fn add_thousands_separators(formatted: &str) -> String {
    let (int_part, dec_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted, None),
    };
    let negative = int_part.starts_with('-');
    let digits = int_part.trim_start_matches('-');

    let mut out = String::with_capacity(formatted.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(d) = dec_part {
        out.push('.');
        out.push_str(d);
    }
    out
}
