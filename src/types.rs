//! Core types for leaderboard snapshots.

use crate::collection::Collection;
use crate::error::{RankError, Result};
use chrono::{Datelike, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raw scalar value stored in a snapshot row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Int(_) | FieldValue::Float(_))
    }

    /// Numeric value as `f64`, `None` for non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True only for numeric values exactly equal to zero.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Int(v) => *v == 0,
            FieldValue::Float(v) => *v == 0.0,
            _ => false,
        }
    }

    /// Zero of the same numeric flavour (`Int(0)` for ints, `Float(0.0)` for floats).
    pub fn zero_like(&self) -> FieldValue {
        match self {
            FieldValue::Float(_) => FieldValue::Float(0.0),
            _ => FieldValue::Int(0),
        }
    }

    /// Exact difference `self - other`.
    ///
    /// Int minus Int stays an Int unless it overflows; any Float operand
    /// makes the result a Float. Returns `None` if either side is not numeric.
    pub fn checked_sub(&self, other: &FieldValue) -> Option<FieldValue> {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(match a.checked_sub(*b) {
                Some(v) => FieldValue::Int(v),
                None => FieldValue::Float(*a as f64 - *b as f64),
            }),
            _ => Some(FieldValue::Float(self.as_f64()? - other.as_f64()?)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// Capture instant in seconds since the Unix epoch (UTC).
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CapturedAt(pub f64);

impl CapturedAt {
    /// Current time.
    pub fn now() -> Self {
        CapturedAt(Utc::now().timestamp_micros() as f64 / 1_000_000.0)
    }

    /// Convert to a UTC datetime, `None` if out of range.
    pub fn to_datetime(&self) -> Option<chrono::DateTime<Utc>> {
        let secs = self.0.floor();
        let nanos = ((self.0 - secs) * 1_000_000_000.0) as u32;
        Utc.timestamp_opt(secs as i64, nanos).single()
    }
}

impl fmt::Debug for CapturedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapturedAt({})", self.0)
    }
}

/// What a snapshot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    /// Country leaderboard, one row per player.
    Rankings,
    /// Top pp plays of the day, one row per score.
    PpRecords,
}

impl DatasetKind {
    /// Suffix used in snapshot file names; rankings carry none.
    pub fn file_suffix(&self) -> Option<&'static str> {
        match self {
            DatasetKind::Rankings => None,
            DatasetKind::PpRecords => Some("pp-records"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Rankings => "rankings",
            DatasetKind::PpRecords => "pp-records",
        }
    }
}

impl Default for DatasetKind {
    fn default() -> Self {
        DatasetKind::Rankings
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rankings" => Ok(DatasetKind::Rankings),
            "pp-records" => Ok(DatasetKind::PpRecords),
            other => Err(RankError::UnknownKind(other.to_string())),
        }
    }
}

/// Game mode a leaderboard belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    Osu,
    Taiko,
    Fruits,
    Mania,
}

impl GameVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Osu => "osu",
            GameVariant::Taiko => "taiko",
            GameVariant::Fruits => "fruits",
            GameVariant::Mania => "mania",
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameVariant {
    type Err = RankError;

    /// Accepts the canonical names plus the numeric ids and short hands
    /// players commonly type.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "osu" | "std" | "standard" | "s" => Ok(GameVariant::Osu),
            "1" | "taiko" | "taco" | "t" => Ok(GameVariant::Taiko),
            "2" | "fruits" | "ctb" | "catch" | "c" => Ok(GameVariant::Fruits),
            "3" | "mania" | "m" => Ok(GameVariant::Mania),
            _ => Err(RankError::UnknownVariant(s.to_string())),
        }
    }
}

/// Calendar day a snapshot was captured on, rendered `YYYY/MM/DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotDate(pub NaiveDate);

impl SnapshotDate {
    /// Today in local time.
    pub fn today() -> Self {
        SnapshotDate(Local::now().date_naive())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(SnapshotDate)
            .ok_or_else(|| RankError::InvalidDate(format!("{year:04}/{month:02}/{day:02}")))
    }

    /// The day `days` before this one.
    pub fn days_before(&self, days: u64) -> Result<Self> {
        self.0
            .checked_sub_days(chrono::Days::new(days))
            .map(SnapshotDate)
            .ok_or_else(|| RankError::InvalidDate(format!("{} minus {} days", self, days)))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Display for SnapshotDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y/%m/%d"))
    }
}

impl FromStr for SnapshotDate {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%Y/%m/%d")
            .map(SnapshotDate)
            .map_err(|_| RankError::InvalidDate(s.to_string()))
    }
}

/// Country, variant and kind a snapshot covers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotScope {
    /// Two-letter country code, or `all` for the global board.
    pub country: String,
    pub variant: GameVariant,
    pub kind: DatasetKind,
}

impl SnapshotScope {
    pub fn new(country: impl Into<String>, variant: GameVariant, kind: DatasetKind) -> Self {
        Self {
            country: country.into(),
            variant,
            kind,
        }
    }

    pub fn rankings(country: impl Into<String>, variant: GameVariant) -> Self {
        Self::new(country, variant, DatasetKind::Rankings)
    }
}

/// Identity value to positional row, in file order.
pub type RecordTable = Collection<Vec<FieldValue>>;

fn default_identity_key() -> String {
    "id".to_string()
}

fn default_country() -> String {
    "all".to_string()
}

/// A single dated capture of ranking or score data.
///
/// Reads both the canonical field names and the legacy ones
/// (`file_version`, `update_date`, `mode`, `type`, `map`, `key`, `data`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Bumped whenever `field_names` changes layout.
    #[serde(alias = "file_version", default)]
    pub schema_version: f64,

    #[serde(alias = "update_date")]
    pub captured_at: CapturedAt,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(alias = "mode")]
    pub variant: GameVariant,

    #[serde(alias = "type", default)]
    pub kind: DatasetKind,

    /// Leaderboard pages fetched, rankings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,

    /// Positional column names shared by every row.
    #[serde(alias = "map")]
    pub field_names: Vec<String>,

    /// Field acting as the unique key of a row.
    #[serde(alias = "key", default = "default_identity_key")]
    pub identity_key: String,

    #[serde(alias = "data")]
    pub records: RecordTable,
}

impl Snapshot {
    /// Start an empty snapshot captured now.
    pub fn new(
        scope: SnapshotScope,
        schema_version: f64,
        field_names: Vec<String>,
        identity_key: impl Into<String>,
    ) -> Self {
        Self {
            schema_version,
            captured_at: CapturedAt::now(),
            country: scope.country,
            variant: scope.variant,
            kind: scope.kind,
            pages: None,
            field_names,
            identity_key: identity_key.into(),
            records: RecordTable::new(),
        }
    }

    pub fn with_captured_at(mut self, captured_at: CapturedAt) -> Self {
        self.captured_at = captured_at;
        self
    }

    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn scope(&self) -> SnapshotScope {
        SnapshotScope::new(self.country.clone(), self.variant, self.kind)
    }

    /// Append a row, checking it lines up with `field_names`.
    pub fn push_record(&mut self, key: impl Into<String>, values: Vec<FieldValue>) -> Result<()> {
        let key = key.into();
        if values.len() != self.field_names.len() {
            return Err(RankError::MalformedSnapshot {
                key,
                expected: self.field_names.len(),
                got: values.len(),
            });
        }
        self.records.insert(key, values);
        Ok(())
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<Vec<u8>> {
        let out = if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        };
        out.map_err(|e| RankError::Serialization(e.to_string()))
    }
}
