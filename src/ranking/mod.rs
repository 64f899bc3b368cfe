//! Ranking views for "top gainer" displays.
//!
//! [`rank`] orders any keyed collection (decoded or delta) by one field,
//! drops records sitting at exactly zero, and keeps ties in collection
//! order. [`top_record`] is the guarded top-1 lookup built on it.

mod summary;
mod view;

pub use summary::{new_entries, summarize, StatSummary};
pub use view::{rank, top_record, RankingView};
