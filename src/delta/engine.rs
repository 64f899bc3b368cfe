//! Day-over-day comparison of two decoded collections.

use crate::collection::{Collection, FieldLookup};
use crate::config::DeltaConfig;
use crate::mapper::{DecodedCollection, DecodedRecord, Schema};
use crate::types::FieldValue;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Per-key result of [`compare`].
///
/// Holds one value per field of the current record: an exact difference
/// for diffed numeric fields, the current value for copied ones.
#[derive(Clone, Debug, PartialEq)]
pub struct DeltaRecord {
    schema: Arc<Schema>,
    new_entry: bool,
    values: Vec<FieldValue>,
}

impl DeltaRecord {
    /// True if the key was absent from the baseline.
    pub fn new_entry(&self) -> bool {
        self.new_entry
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.position(name).map(|pos| &self.values[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl FieldLookup for DeltaRecord {
    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

/// Key the new-entrant flag is written under.
pub const NEW_ENTRY_KEY: &str = "new_entry";

/// Serializes as a flat map led by the new-entrant flag. A snapshot column
/// that shares the flag's name is left out of the output.
impl Serialize for DeltaRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields: Vec<(&str, &FieldValue)> = self
            .iter()
            .filter(|(name, _)| *name != NEW_ENTRY_KEY)
            .collect();
        let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
        map.serialize_entry(NEW_ENTRY_KEY, &self.new_entry)?;
        for (name, value) in fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Delta records keyed like the current collection they came from.
pub type DeltaCollection = Collection<DeltaRecord>;

/// Compare `current` against `baseline`, producing one delta per current key.
///
/// - Keys only in `baseline` are dropped.
/// - Keys only in `current` are new entries: every diffed field is zero.
/// - Diffed numeric fields are `current - baseline`, or `baseline - current`
///   for fields in `config.inverted`, so a positive delta always means an
///   improvement. A field missing from the baseline record counts as 0.
/// - Copied fields (`config.descriptive` and the identity key) and
///   non-numeric values are carried over from the current record.
///
/// No rounding is applied.
pub fn compare(
    current: &DecodedCollection,
    baseline: &DecodedCollection,
    config: &DeltaConfig,
) -> DeltaCollection {
    let mut deltas = DeltaCollection::with_capacity(current.len());
    let mut non_numeric: BTreeSet<String> = BTreeSet::new();
    let mut new_entries = 0usize;

    for (key, record) in current.iter() {
        let previous = baseline.get(key);
        if previous.is_none() {
            new_entries += 1;
        }

        let values = record
            .iter()
            .map(|(name, value)| {
                if config.is_copied(name) {
                    return value.clone();
                }
                if !value.is_numeric() {
                    if !matches!(value, FieldValue::Null) {
                        non_numeric.insert(name.to_string());
                    }
                    return value.clone();
                }
                match previous {
                    Some(previous) => field_delta(name, value, previous, config),
                    None => value.zero_like(),
                }
            })
            .collect();

        deltas.insert(
            key,
            DeltaRecord {
                schema: Arc::clone(record.schema()),
                new_entry: previous.is_none(),
                values,
            },
        );
    }

    if !non_numeric.is_empty() {
        tracing::warn!(
            target: "rankdiff::delta",
            fields = ?non_numeric,
            "non-numeric values in diffed fields were copied unchanged"
        );
    }

    tracing::debug!(
        target: "rankdiff::delta",
        current = current.len(),
        baseline = baseline.len(),
        new_entries,
        "snapshots compared"
    );

    deltas
}

fn field_delta(
    name: &str,
    current: &FieldValue,
    previous: &DecodedRecord,
    config: &DeltaConfig,
) -> FieldValue {
    let zero = current.zero_like();
    let before = match previous.get(name) {
        None => &zero,
        Some(value) if value.is_numeric() => value,
        // A null or text baseline carries no signal.
        Some(_) => return zero,
    };

    let diff = if config.is_inverted(name) {
        before.checked_sub(current)
    } else {
        current.checked_sub(before)
    };
    diff.unwrap_or(zero)
}
