//! Sorted, zero-filtered projections of a collection.

use crate::collection::{Collection, FieldLookup};
use crate::error::{RankError, Result};
use crate::types::FieldValue;
use std::cmp::Ordering;

/// Numeric, non-zero value of `field`, or `None` if the record is left out.
fn sort_value<'r, R: FieldLookup>(record: &'r R, field: &str) -> Option<&'r FieldValue> {
    record
        .field(field)
        .filter(|value| value.is_numeric() && !value.is_zero())
}

/// Ints compare exactly; anything involving a float goes through `f64`.
fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Int(x), FieldValue::Int(y)) => x.cmp(y),
        _ => {
            let x = a.as_f64().unwrap_or(0.0);
            let y = b.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
    }
}

/// Records of a collection ordered by one field.
///
/// Borrowed from the source collection, which is never modified.
#[derive(Debug)]
pub struct RankingView<'a, R> {
    field: String,
    descending: bool,
    entries: Vec<(&'a str, &'a R)>,
}

// Manual impl: the derive would require `R: Clone` for a view of references.
impl<'a, R> Clone for RankingView<'a, R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            descending: self.descending,
            entries: self.entries.clone(),
        }
    }
}

impl<'a, R: FieldLookup> RankingView<'a, R> {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a R)> + '_ {
        self.entries.iter().copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// The first `n` entries (fewer if the view is shorter).
    pub fn top(&self, n: usize) -> &[(&'a str, &'a R)] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn first(&self) -> Option<(&'a str, &'a R)> {
        self.entries.first().copied()
    }

    /// The leading entry, or [`RankError::NoQualifyingRecord`] for an empty view.
    pub fn require_first(&self) -> Result<(&'a str, &'a R)> {
        self.first().ok_or_else(|| RankError::NoQualifyingRecord {
            field: self.field.clone(),
        })
    }

    pub fn into_vec(self) -> Vec<(&'a str, &'a R)> {
        self.entries
    }
}

/// Order `collection` by `field`, dropping records whose value is exactly zero.
///
/// Missing and non-numeric values count as zero and are therefore dropped.
/// The sort is stable: equal values keep their collection order.
pub fn rank<'a, R: FieldLookup>(
    collection: &'a Collection<R>,
    field: &str,
    descending: bool,
) -> RankingView<'a, R> {
    let mut keyed: Vec<(&'a FieldValue, (&'a str, &'a R))> = collection
        .iter()
        .filter_map(|(key, record)| Some((sort_value(record, field)?, (key, record))))
        .collect();

    if descending {
        keyed.sort_by(|a, b| compare_values(b.0, a.0));
    } else {
        keyed.sort_by(|a, b| compare_values(a.0, b.0));
    }

    RankingView {
        field: field.to_string(),
        descending,
        entries: keyed.into_iter().map(|(_, entry)| entry).collect(),
    }
}

/// The single best record by `field`.
///
/// Fails with [`RankError::NoQualifyingRecord`] when every record is zero
/// or the collection is empty; callers substitute a placeholder.
pub fn top_record<'a, R: FieldLookup>(
    collection: &'a Collection<R>,
    field: &str,
    descending: bool,
) -> Result<(&'a str, &'a R)> {
    rank(collection, field, descending).require_first()
}
