//! Aggregate views over a delta collection.

use crate::collection::{Collection, FieldLookup};
use crate::delta::{DeltaCollection, DeltaRecord};
use crate::types::FieldValue;
use serde::Serialize;

/// How many records gained in a field, and how much in total.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatSummary {
    pub field: String,
    /// Records whose value is strictly positive.
    pub gainers: usize,
    /// Sum of the strictly positive values. Stays an integer unless a
    /// float value was summed.
    pub total: FieldValue,
}

/// Count and sum the positive values of `field`.
pub fn summarize<R: FieldLookup>(collection: &Collection<R>, field: &str) -> StatSummary {
    let mut gainers = 0usize;
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0f64;
    let mut saw_float = false;

    for record in collection.values() {
        match record.field(field) {
            Some(FieldValue::Int(v)) if *v > 0 => {
                gainers += 1;
                int_total = int_total.and_then(|t| t.checked_add(*v));
                float_total += *v as f64;
            }
            Some(FieldValue::Float(v)) if *v > 0.0 => {
                gainers += 1;
                saw_float = true;
                float_total += *v;
            }
            _ => {}
        }
    }

    let total = match int_total {
        Some(t) if !saw_float => FieldValue::Int(t),
        _ => FieldValue::Float(float_total),
    };

    StatSummary {
        field: field.to_string(),
        gainers,
        total,
    }
}

/// Records flagged as new entrants, in collection order.
pub fn new_entries(deltas: &DeltaCollection) -> Vec<(&str, &DeltaRecord)> {
    deltas
        .iter()
        .filter(|(_, record)| record.new_entry())
        .collect()
}
