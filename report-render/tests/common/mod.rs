//! FILENAME: tests/common/mod.rs
//! Shared fixtures for sink integration tests.

#![allow(dead_code)]

use report_engine::{ArraySource, Record};

/// Inventory rows grouped two-and-one across categories A and B, with the
/// field spread (text, money, boolean, date) the format rules exercise.
pub fn inventory_records() -> Vec<Record> {
    vec![
        Record::new()
            .with("product", "Laptop")
            .with("amount", 1234.5)
            .with("active", true)
            .with("created_at", "2025-01-15")
            .with("category", "A"),
        Record::new()
            .with("product", "Monitor")
            .with("amount", 987.65)
            .with("active", false)
            .with("created_at", "2025-02-20")
            .with("category", "A"),
        Record::new()
            .with("product", "Desk")
            .with("amount", 500)
            .with("active", true)
            .with("created_at", "2025-03-01")
            .with("category", "B"),
    ]
}

pub fn inventory_source() -> ArraySource {
    ArraySource::new(inventory_records())
}

/// Flat customer rows for ungrouped documents.
pub fn customer_records() -> Vec<Record> {
    vec![
        Record::new().with("id", 1).with("name", "Alice").with("amount", 100.5),
        Record::new().with("id", 2).with("name", "Bob").with("amount", 250),
        Record::new().with("id", 3).with("name", "Carol").with("amount", 75.25),
    ]
}
