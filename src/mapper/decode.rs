//! Positional snapshot rows to named-field records.

use crate::collection::{Collection, FieldLookup};
use crate::error::{RankError, Result};
use crate::types::{FieldValue, RecordTable, Snapshot};
use std::collections::HashMap;
use std::sync::Arc;

/// Column layout shared by every record decoded from one snapshot.
#[derive(Debug, PartialEq)]
pub struct Schema {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Schema {
    pub fn new(names: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Self { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One decoded row: field name to raw value.
///
/// Values are passed through untouched; callers that need a type check
/// go through the typed records in [`super::typed`].
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedRecord {
    schema: Arc<Schema>,
    values: Vec<FieldValue>,
}

impl DecodedRecord {
    pub(crate) fn new(schema: Arc<Schema>, values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    /// Build a standalone record from `(name, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let (names, values): (Vec<String>, Vec<FieldValue>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(Arc::new(Schema::new(names)), values)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.position(name).map(|pos| &self.values[pos])
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Fields in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl FieldLookup for DecodedRecord {
    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

/// Decoded records keyed by identity value, in snapshot order.
pub type DecodedCollection = Collection<DecodedRecord>;

/// Zip every row of `snapshot` with its field names.
///
/// Fails with [`RankError::MalformedSnapshot`] on the first row whose
/// length differs from `field_names`. A row whose own identity field
/// disagrees with its key is kept and logged.
pub fn decode(snapshot: &Snapshot) -> Result<DecodedCollection> {
    let schema = Arc::new(Schema::new(snapshot.field_names.clone()));
    let identity_pos = schema.position(&snapshot.identity_key);
    let mut decoded = DecodedCollection::with_capacity(snapshot.records.len());

    for (key, values) in snapshot.records.iter() {
        if values.len() != schema.len() {
            return Err(RankError::MalformedSnapshot {
                key: key.to_string(),
                expected: schema.len(),
                got: values.len(),
            });
        }

        if let Some(pos) = identity_pos {
            let embedded = values[pos].to_string();
            if embedded != key {
                tracing::warn!(
                    target: "rankdiff::mapper",
                    key,
                    embedded = %embedded,
                    identity_key = %snapshot.identity_key,
                    "identity field does not match record key"
                );
            }
        }

        decoded.insert(key, DecodedRecord::new(Arc::clone(&schema), values.clone()));
    }

    tracing::debug!(
        target: "rankdiff::mapper",
        country = %snapshot.country,
        variant = %snapshot.variant,
        kind = %snapshot.kind,
        records = decoded.len(),
        "snapshot decoded"
    );

    Ok(decoded)
}

/// Re-encode decoded records positionally against `field_names`.
///
/// Records whose schema already matches `field_names` are copied as-is,
/// so rows with repeated column names come back unchanged.
pub fn encode(collection: &DecodedCollection, field_names: &[String]) -> Result<RecordTable> {
    let mut table = RecordTable::with_capacity(collection.len());
    for (key, record) in collection.iter() {
        if record.schema().names() == field_names {
            table.insert(key, record.values().to_vec());
            continue;
        }
        let values = field_names
            .iter()
            .map(|name| {
                record
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RankError::MissingField(format!("{key}.{name}")))
            })
            .collect::<Result<Vec<_>>>()?;
        table.insert(key, values);
    }
    Ok(table)
}
