//! Typed views of decoded records, one struct per dataset kind.

use super::decode::{decode, DecodedRecord};
use crate::collection::Collection;
use crate::error::{RankError, Result};
use crate::types::{DatasetKind, FieldValue, Snapshot};
use serde::{Deserialize, Serialize};

fn field<'a>(record: &'a DecodedRecord, name: &str) -> Result<&'a FieldValue> {
    record
        .get(name)
        .ok_or_else(|| RankError::MissingField(name.to_string()))
}

fn int(record: &DecodedRecord, name: &str) -> Result<i64> {
    field(record, name)?.as_i64().ok_or(RankError::FieldType {
        field: name.to_string(),
        expected: "an integer",
    })
}

fn opt_int(record: &DecodedRecord, name: &str) -> Result<Option<i64>> {
    match field(record, name)? {
        FieldValue::Null => Ok(None),
        other => other.as_i64().map(Some).ok_or(RankError::FieldType {
            field: name.to_string(),
            expected: "an integer or null",
        }),
    }
}

fn float(record: &DecodedRecord, name: &str) -> Result<f64> {
    field(record, name)?.as_f64().ok_or(RankError::FieldType {
        field: name.to_string(),
        expected: "a number",
    })
}

fn text(record: &DecodedRecord, name: &str) -> Result<String> {
    field(record, name)?
        .as_str()
        .map(str::to_string)
        .ok_or(RankError::FieldType {
            field: name.to_string(),
            expected: "a string",
        })
}

fn boolean(record: &DecodedRecord, name: &str) -> Result<bool> {
    field(record, name)?.as_bool().ok_or(RankError::FieldType {
        field: name.to_string(),
        expected: "a boolean",
    })
}

fn expect_kind(snapshot: &Snapshot, kind: DatasetKind) -> Result<()> {
    if snapshot.kind != kind {
        return Err(RankError::Config(format!(
            "expected a {} snapshot, got {}",
            kind, snapshot.kind
        )));
    }
    Ok(())
}

/// One player on a country leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub country_rank: i64,
    /// `None` for players without a global rank (inactive accounts).
    pub global_rank: Option<i64>,
    pub ign: String,
    pub pp: i64,
    pub acc: f64,
    pub play_count: i64,
    pub rank_x: i64,
    pub rank_s: i64,
    pub rank_a: i64,
    pub play_time: i64,
    pub total_score: i64,
    pub ranked_score: i64,
    pub total_hits: i64,
}

impl RankingRecord {
    pub const SCHEMA_VERSION: f64 = 1.01;
    pub const IDENTITY_KEY: &'static str = "id";
    pub const FIELD_NAMES: [&'static str; 13] = [
        "country_rank",
        "global_rank",
        "ign",
        "pp",
        "acc",
        "play_count",
        "rank_x",
        "rank_s",
        "rank_a",
        "play_time",
        "total_score",
        "ranked_score",
        "total_hits",
    ];

    pub fn field_names() -> Vec<String> {
        Self::FIELD_NAMES.iter().map(|s| s.to_string()).collect()
    }

    /// Values in [`Self::FIELD_NAMES`] order.
    pub fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Int(self.country_rank),
            self.global_rank.map_or(FieldValue::Null, FieldValue::Int),
            FieldValue::Text(self.ign.clone()),
            FieldValue::Int(self.pp),
            FieldValue::Float(self.acc),
            FieldValue::Int(self.play_count),
            FieldValue::Int(self.rank_x),
            FieldValue::Int(self.rank_s),
            FieldValue::Int(self.rank_a),
            FieldValue::Int(self.play_time),
            FieldValue::Int(self.total_score),
            FieldValue::Int(self.ranked_score),
            FieldValue::Int(self.total_hits),
        ]
    }
}

impl TryFrom<&DecodedRecord> for RankingRecord {
    type Error = RankError;

    fn try_from(record: &DecodedRecord) -> Result<Self> {
        Ok(Self {
            country_rank: int(record, "country_rank")?,
            global_rank: opt_int(record, "global_rank")?,
            ign: text(record, "ign")?,
            pp: int(record, "pp")?,
            acc: float(record, "acc")?,
            play_count: int(record, "play_count")?,
            rank_x: int(record, "rank_x")?,
            rank_s: int(record, "rank_s")?,
            rank_a: int(record, "rank_a")?,
            play_time: int(record, "play_time")?,
            total_score: int(record, "total_score")?,
            ranked_score: int(record, "ranked_score")?,
            total_hits: int(record, "total_hits")?,
        })
    }
}

/// One submitted play in a pp-records snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// `old` for legacy score ids, `new` otherwise.
    pub score_type: String,
    pub score_mods: String,
    pub score_pp: f64,
    pub score_grade: String,
    pub user_id: i64,
    pub user_name: String,
    pub beatmapset_title: String,
    pub beatmap_version: String,
    pub beatmap_id: i64,
    pub beatmapset_id: i64,
    pub beatmap_difficulty: f64,
    pub full_combo: bool,
    pub max_combo: i64,
    pub count_300: i64,
    pub count_100: i64,
    pub count_50: i64,
    pub count_droplet_miss: i64,
    pub count_miss: i64,
    pub accuracy: f64,
}

impl ScoreRecord {
    pub const SCHEMA_VERSION: f64 = 1.011;
    pub const IDENTITY_KEY: &'static str = "score_id";
    pub const FIELD_NAMES: [&'static str; 19] = [
        "score_type",
        "score_mods",
        "score_pp",
        "score_grade",
        "user_id",
        "user_name",
        "beatmapset_title",
        "beatmap_version",
        "beatmap_id",
        "beatmapset_id",
        "beatmap_difficulty",
        "full_combo",
        "max_combo",
        "count_300",
        "count_100",
        "count_50",
        "count_droplet_miss",
        "count_miss",
        "accuracy",
    ];

    pub fn field_names() -> Vec<String> {
        Self::FIELD_NAMES.iter().map(|s| s.to_string()).collect()
    }

    /// Values in [`Self::FIELD_NAMES`] order.
    pub fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.score_type.clone()),
            FieldValue::Text(self.score_mods.clone()),
            FieldValue::Float(self.score_pp),
            FieldValue::Text(self.score_grade.clone()),
            FieldValue::Int(self.user_id),
            FieldValue::Text(self.user_name.clone()),
            FieldValue::Text(self.beatmapset_title.clone()),
            FieldValue::Text(self.beatmap_version.clone()),
            FieldValue::Int(self.beatmap_id),
            FieldValue::Int(self.beatmapset_id),
            FieldValue::Float(self.beatmap_difficulty),
            FieldValue::Bool(self.full_combo),
            FieldValue::Int(self.max_combo),
            FieldValue::Int(self.count_300),
            FieldValue::Int(self.count_100),
            FieldValue::Int(self.count_50),
            FieldValue::Int(self.count_droplet_miss),
            FieldValue::Int(self.count_miss),
            FieldValue::Float(self.accuracy),
        ]
    }
}

impl TryFrom<&DecodedRecord> for ScoreRecord {
    type Error = RankError;

    fn try_from(record: &DecodedRecord) -> Result<Self> {
        Ok(Self {
            score_type: text(record, "score_type")?,
            score_mods: text(record, "score_mods")?,
            score_pp: float(record, "score_pp")?,
            score_grade: text(record, "score_grade")?,
            user_id: int(record, "user_id")?,
            user_name: text(record, "user_name")?,
            beatmapset_title: text(record, "beatmapset_title")?,
            beatmap_version: text(record, "beatmap_version")?,
            beatmap_id: int(record, "beatmap_id")?,
            beatmapset_id: int(record, "beatmapset_id")?,
            beatmap_difficulty: float(record, "beatmap_difficulty")?,
            full_combo: boolean(record, "full_combo")?,
            max_combo: int(record, "max_combo")?,
            count_300: int(record, "count_300")?,
            count_100: int(record, "count_100")?,
            count_50: int(record, "count_50")?,
            // Older pp-records files predate this column.
            count_droplet_miss: match record.get("count_droplet_miss") {
                Some(_) => int(record, "count_droplet_miss")?,
                None => 0,
            },
            count_miss: int(record, "count_miss")?,
            accuracy: float(record, "accuracy")?,
        })
    }
}

/// Decode a rankings snapshot straight into [`RankingRecord`]s.
pub fn decode_rankings(snapshot: &Snapshot) -> Result<Collection<RankingRecord>> {
    expect_kind(snapshot, DatasetKind::Rankings)?;
    decode(snapshot)?
        .iter()
        .map(|(key, record)| -> Result<(String, RankingRecord)> {
            Ok((key.to_string(), RankingRecord::try_from(record)?))
        })
        .collect()
}

/// Decode a pp-records snapshot straight into [`ScoreRecord`]s.
pub fn decode_scores(snapshot: &Snapshot) -> Result<Collection<ScoreRecord>> {
    expect_kind(snapshot, DatasetKind::PpRecords)?;
    decode(snapshot)?
        .iter()
        .map(|(key, record)| -> Result<(String, ScoreRecord)> {
            Ok((key.to_string(), ScoreRecord::try_from(record)?))
        })
        .collect()
}
