//! # rankdiff
//!
//! Daily leaderboard snapshots, day-over-day deltas and top-gainer views.
//!
//! ## Core Concepts
//!
//! - **Snapshots**: one dated capture of a country leaderboard (or of the
//!   day's top plays), stored as a shared column list plus one value array
//!   per identity key
//! - **Field mapper**: zips those arrays back into named-field records
//! - **Delta engine**: aligns two captures by key; positive always means
//!   "improved", even for lower-is-better fields like rank
//! - **Ranking views**: stable, zero-filtered orderings for "top gainers"
//!
//! Rendering pages or chat messages is left to the caller: the
//! [`report`] module produces the data they consume.
//!
//! ## Example
//!
//! ```ignore
//! use rankdiff::{
//!     ActivityReport, Comparison, ComparisonRange, DatasetKind, GameVariant, Profiles,
//!     ReportOptions, SnapshotDate, SnapshotScope, SnapshotStore, StoreConfig,
//! };
//!
//! let profiles = Profiles::load_from_env()?;
//! profiles.validate(&[DatasetKind::Rankings])?;
//!
//! let store = SnapshotStore::open(StoreConfig::default())?;
//! let comparison = Comparison::load(
//!     &store,
//!     SnapshotDate::today(),
//!     ComparisonRange::Yesterday,
//!     &SnapshotScope::rankings("PH", GameVariant::Fruits),
//!     profiles.require(DatasetKind::Rankings)?,
//! )?;
//!
//! if let Some(report) = ActivityReport::from_comparison(&comparison, &ReportOptions::default()) {
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//! }
//! ```

pub mod collection;
pub mod config;
pub mod delta;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod store;
pub mod types;

// Re-exports
pub use collection::{Collection, FieldLookup};
pub use config::{DeltaConfig, Profiles};
pub use delta::{compare, DeltaCollection, DeltaRecord};
pub use error::{RankError, Result};
pub use mapper::{
    decode, decode_rankings, decode_scores, encode, DecodedCollection, DecodedRecord,
    RankingRecord, Schema, ScoreRecord,
};
pub use pipeline::{Comparison, ComparisonRange};
pub use ranking::{new_entries, rank, summarize, top_record, RankingView, StatSummary};
pub use report::{ActivityReport, Gainer, Highlight, NewEntrant, ReportOptions, StatReport};
pub use store::{SnapshotStore, StoreConfig};
pub use types::*;
