//! FILENAME: report-render/src/lib.rs
//! Built-in band sinks for `report-engine`.
//!
//! Two complete sinks plus the formatting layer they share:
//! - `html`: self-contained HTML table fragment
//! - `json`: machine-readable JSON document
//! - `format`: column format rules applied to display values
//!
//! Anything these sinks do, an external sink can do too: they only consume
//! the public band protocol.

pub mod format;
pub mod html;
pub mod json;

pub use format::{format_number, format_value};
pub use html::HtmlTableRenderer;
pub use json::JsonRenderer;
