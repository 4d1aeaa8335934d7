//! FILENAME: report-engine/src/value.rs
//! Field values as they flow through records, group keys and band contexts.
//!
//! `Value` is deliberately small: the engine only ever inspects values in two
//! ways (numeric coercion for aggregation, token form for break detection),
//! so anything richer belongs in the caller's records or in a sink.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ============================================================================
// VALUE
// ============================================================================

/// A single field value inside a record, group key or context entry.
///
/// Serializes untagged, so records round-trip naturally to and from JSON
/// (`null`, booleans, numbers, strings, arrays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Shared so that cloning a record never deep-copies list payloads, and
    /// so that key identity (see [`Value::key_token`]) survives the clone.
    Array(Arc<Vec<Value>>),
}

impl Value {
    /// Builds an array value from owned items.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used by the aggregation layer.
    ///
    /// Missing data and non-numeric text coerce to zero rather than erroring,
    /// so one bad cell never aborts a report pass. Numeric text (`"100"`,
    /// `" 2.5 "`) participates with its parsed value.
    pub fn coerce_f64(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse().unwrap_or(0.0),
            Value::Array(_) => 0.0,
        }
    }

    /// Opaque token used for group-key comparison.
    ///
    /// Scalars compare by their canonical text. Arrays compare by the
    /// identity of their shared allocation: two clones of one array value
    /// produce the same token, while a structurally equal but separately
    /// built array produces a different one. Group keys answer "is this
    /// still the same run of records", not "are these equal".
    pub fn key_token(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => render_number(*n),
            Value::Text(s) => s.clone(),
            Value::Array(items) => format!("array@{:p}", Arc::as_ptr(items)),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// Display form: what a sink prints when no format rule applies.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", render_number(*n)),
            Value::Text(s) => write!(f, "{}", s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Integral floats print without a trailing `.0` so that keys and cells read
/// like source data (`2024`, not `2024.0`).
fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::array(v)
    }
}
