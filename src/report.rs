//! Report data handed to presentation layers (pages, chat messages).
//!
//! Built from a finished comparison; nothing here renders or sends.

use crate::collection::FieldLookup;
use crate::delta::DeltaCollection;
use crate::error::RankError;
use crate::mapper::DecodedCollection;
use crate::pipeline::Comparison;
use crate::ranking::{new_entries, rank, summarize, top_record, StatSummary};
use crate::types::FieldValue;
use serde::Serialize;

/// Name shown when no record qualifies for a highlight.
pub const PLACEHOLDER_NAME: &str = "nobody";

/// What to put in an [`ActivityReport`].
#[derive(Clone, Debug)]
pub struct ReportOptions {
    /// Delta fields to rank, in display order.
    pub stats: Vec<String>,

    /// Gainers listed per stat.
    pub top: usize,

    /// Field holding a record's display name.
    pub name_field: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            stats: ["pp", "country_rank", "play_count", "ranked_score"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            top: 5,
            name_field: "ign".to_string(),
        }
    }
}

/// One line of a top-gainers list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Gainer {
    pub key: String,
    pub name: String,
    pub gained: FieldValue,
    /// Baseline value, if the record was in the baseline.
    pub before: Option<FieldValue>,
    pub after: Option<FieldValue>,
}

/// The single biggest positive gain for a stat, or the placeholder when
/// nobody gained.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Highlight {
    pub key: Option<String>,
    pub name: String,
    pub gained: FieldValue,
}

impl Highlight {
    pub fn placeholder() -> Self {
        Self {
            key: None,
            name: PLACEHOLDER_NAME.to_string(),
            gained: FieldValue::Int(0),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.key.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatReport {
    pub field: String,
    pub top: Vec<Gainer>,
    pub highlight: Highlight,
    pub summary: StatSummary,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewEntrant {
    pub key: String,
    pub name: String,
}

/// Top gainers, highlights, totals and new entrants for one comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivityReport {
    pub stats: Vec<StatReport>,
    pub new_entries: Vec<NewEntrant>,
}

fn display_name<R: FieldLookup>(record: &R, name_field: &str, key: &str) -> String {
    match record.field(name_field) {
        Some(FieldValue::Text(name)) => name.clone(),
        _ => key.to_string(),
    }
}

impl ActivityReport {
    pub fn build(
        current: &DecodedCollection,
        baseline: &DecodedCollection,
        deltas: &DeltaCollection,
        options: &ReportOptions,
    ) -> Self {
        let stats = options
            .stats
            .iter()
            .map(|field| {
                let top = rank(deltas, field, true)
                    .top(options.top)
                    .iter()
                    .filter_map(|(key, record)| {
                        let gained = record.get(field)?.clone();
                        // Only gains make the list.
                        if gained.as_f64()? <= 0.0 {
                            return None;
                        }
                        Some(Gainer {
                            key: key.to_string(),
                            name: display_name(*record, &options.name_field, key),
                            gained,
                            before: baseline.get(key).and_then(|r| r.get(field)).cloned(),
                            after: current.get(key).and_then(|r| r.get(field)).cloned(),
                        })
                    })
                    .collect();

                let highlight = match top_record(deltas, field, true) {
                    Ok((key, record)) => match record.get(field) {
                        Some(gained) if gained.as_f64().is_some_and(|v| v > 0.0) => Highlight {
                            key: Some(key.to_string()),
                            name: display_name(record, &options.name_field, key),
                            gained: gained.clone(),
                        },
                        _ => Highlight::placeholder(),
                    },
                    Err(RankError::NoQualifyingRecord { .. }) => {
                        tracing::debug!(
                            target: "rankdiff::report",
                            field = %field,
                            "no qualifying record, using placeholder"
                        );
                        Highlight::placeholder()
                    }
                    Err(e) => {
                        tracing::warn!(target: "rankdiff::report", error = %e, "highlight failed");
                        Highlight::placeholder()
                    }
                };

                StatReport {
                    field: field.clone(),
                    top,
                    highlight,
                    summary: summarize(deltas, field),
                }
            })
            .collect();

        let new_entries = new_entries(deltas)
            .into_iter()
            .map(|(key, record)| NewEntrant {
                key: key.to_string(),
                name: display_name(record, &options.name_field, key),
            })
            .collect();

        Self { stats, new_entries }
    }

    /// Build from a comparison, `None` unless both snapshots were present.
    pub fn from_comparison(comparison: &Comparison, options: &ReportOptions) -> Option<Self> {
        match (&comparison.current, &comparison.baseline, &comparison.delta) {
            (Some(current), Some(baseline), Some(deltas)) => {
                Some(Self::build(current, baseline, deltas, options))
            }
            _ => None,
        }
    }

    pub fn stat(&self, field: &str) -> Option<&StatReport> {
        self.stats.iter().find(|s| s.field == field)
    }
}
