//! FILENAME: report-engine/src/aggregate.rs
//! Running aggregate state.
//!
//! One [`Accumulator`] per aggregate definition, fed record by record. Sum
//! and average share a running sum plus sample count; min and max keep an
//! unset state so the first sample always wins regardless of sign.

use crate::definition::{AggregateKind, AggregateSpec, FieldExpr};
use crate::record::Record;
use crate::value::Value;

/// Stateful running computation of one aggregate over one field.
#[derive(Debug, Clone)]
pub struct Accumulator {
    kind: AggregateKind,
    field: FieldExpr,
    sum: f64,
    count: u64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    pub fn new(kind: AggregateKind, field: FieldExpr) -> Self {
        Accumulator {
            kind,
            field,
            sum: 0.0,
            count: 0,
            min: None,
            max: None,
        }
    }

    pub fn for_spec(spec: &AggregateSpec) -> Self {
        Accumulator::new(spec.kind, spec.field.clone())
    }

    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    /// Feeds one record. The input field is coerced to a float; a missing
    /// field contributes zero (and still counts as a sample).
    pub fn accumulate(&mut self, record: &Record) {
        let value = self.field.extract(record).coerce_f64();
        match self.kind {
            AggregateKind::Sum | AggregateKind::Avg => {
                self.sum += value;
                self.count += 1;
            }
            AggregateKind::Count => self.count += 1,
            AggregateKind::Min => self.min = Some(self.min.map_or(value, |m| m.min(value))),
            AggregateKind::Max => self.max = Some(self.max.map_or(value, |m| m.max(value))),
        }
    }

    /// Current result. Safe at any point, including before the first sample:
    /// an average over zero samples is 0, as are unset min and max.
    pub fn value(&self) -> f64 {
        match self.kind {
            AggregateKind::Sum => self.sum,
            AggregateKind::Avg => {
                if self.count > 0 {
                    self.sum / self.count as f64
                } else {
                    0.0
                }
            }
            AggregateKind::Count => self.count as f64,
            AggregateKind::Min => self.min.unwrap_or(0.0),
            AggregateKind::Max => self.max.unwrap_or(0.0),
        }
    }

    /// Result wrapped as a context value.
    pub fn value_as_value(&self) -> Value {
        Value::Number(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(kind: AggregateKind, values: &[f64]) -> Accumulator {
        let mut acc = Accumulator::new(kind, FieldExpr::from("amount"));
        for v in values {
            acc.accumulate(&Record::new().with("amount", *v));
        }
        acc
    }

    #[test]
    fn test_sum() {
        assert_eq!(feed(AggregateKind::Sum, &[100.0, 200.0, 300.0]).value(), 600.0);
        assert_eq!(feed(AggregateKind::Sum, &[]).value(), 0.0);
    }

    #[test]
    fn test_avg() {
        assert_eq!(feed(AggregateKind::Avg, &[100.0, 200.0, 300.0]).value(), 200.0);
        assert_eq!(feed(AggregateKind::Avg, &[30.0, 50.0]).value(), 40.0);
        // No samples: defined as zero, not NaN.
        assert_eq!(feed(AggregateKind::Avg, &[]).value(), 0.0);
    }

    #[test]
    fn test_count_ignores_values() {
        assert_eq!(feed(AggregateKind::Count, &[1.0, -7.5, 0.0]).value(), 3.0);
        assert_eq!(feed(AggregateKind::Count, &[]).value(), 0.0);
    }

    #[test]
    fn test_min_max_first_sample_wins() {
        assert_eq!(feed(AggregateKind::Min, &[100.0, 300.0, 200.0]).value(), 100.0);
        assert_eq!(feed(AggregateKind::Max, &[100.0, 300.0, 200.0]).value(), 300.0);

        // All-negative input must not be beaten by a zero initial state.
        assert_eq!(feed(AggregateKind::Min, &[-5.0, -3.0]).value(), -5.0);
        assert_eq!(feed(AggregateKind::Max, &[-5.0, -3.0]).value(), -3.0);

        assert_eq!(feed(AggregateKind::Min, &[]).value(), 0.0);
        assert_eq!(feed(AggregateKind::Max, &[]).value(), 0.0);
    }

    #[test]
    fn test_missing_field_coerces_to_zero_but_counts() {
        let mut sum = Accumulator::new(AggregateKind::Sum, FieldExpr::from("amount"));
        let mut avg = Accumulator::new(AggregateKind::Avg, FieldExpr::from("amount"));
        for record in [
            Record::new().with("amount", 10),
            Record::new().with("other", 99),
        ] {
            sum.accumulate(&record);
            avg.accumulate(&record);
        }
        assert_eq!(sum.value(), 10.0);
        assert_eq!(avg.value(), 5.0);
    }

    #[test]
    fn test_numeric_text_participates() {
        let mut acc = Accumulator::new(AggregateKind::Sum, FieldExpr::from("amount"));
        acc.accumulate(&Record::new().with("amount", "100"));
        acc.accumulate(&Record::new().with("amount", "2.5"));
        acc.accumulate(&Record::new().with("amount", "n/a"));
        assert_eq!(acc.value(), 102.5);
    }

    #[test]
    fn test_computed_field_input() {
        let expr = FieldExpr::computed(|r: &Record| {
            Value::from(r.get("qty").map_or(0.0, Value::coerce_f64) * 2.0)
        });
        let mut acc = Accumulator::new(AggregateKind::Sum, expr);
        acc.accumulate(&Record::new().with("qty", 3));
        acc.accumulate(&Record::new().with("qty", 4));
        assert_eq!(acc.value(), 14.0);
    }
}
