//! Field mapper: columnar snapshot rows to named-field records.
//!
//! A snapshot stores one shared list of column names and one value array
//! per identity key. [`decode`] zips the two into [`DecodedRecord`]s that
//! share a single [`Schema`]; [`encode`] goes the other way. The typed
//! records in [`typed`] sit on top for callers that want checked fields.

mod decode;
pub mod typed;

pub use decode::{decode, encode, DecodedCollection, DecodedRecord, Schema};
pub use typed::{decode_rankings, decode_scores, RankingRecord, ScoreRecord};
