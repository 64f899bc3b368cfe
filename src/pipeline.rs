//! One comparison run: load two dated snapshots, decode, diff.

use crate::config::DeltaConfig;
use crate::delta::{compare, DeltaCollection};
use crate::error::{RankError, Result};
use crate::mapper::{decode, DecodedCollection};
use crate::store::SnapshotStore;
use crate::types::{CapturedAt, SnapshotDate, SnapshotScope};
use std::fmt;
use std::str::FromStr;

/// How far back the baseline snapshot is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonRange {
    Yesterday,
    Week,
    Month,
    Year,
    Days(u64),
}

impl ComparisonRange {
    pub fn days(&self) -> u64 {
        match self {
            ComparisonRange::Yesterday => 1,
            ComparisonRange::Week => 7,
            ComparisonRange::Month => 30,
            ComparisonRange::Year => 365,
            ComparisonRange::Days(n) => *n,
        }
    }
}

impl fmt::Display for ComparisonRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonRange::Yesterday => f.write_str("yesterday"),
            ComparisonRange::Week => f.write_str("week"),
            ComparisonRange::Month => f.write_str("month"),
            ComparisonRange::Year => f.write_str("year"),
            ComparisonRange::Days(n) => write!(f, "{n} days"),
        }
    }
}

impl FromStr for ComparisonRange {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yesterday" => Ok(ComparisonRange::Yesterday),
            "week" => Ok(ComparisonRange::Week),
            "month" => Ok(ComparisonRange::Month),
            "year" => Ok(ComparisonRange::Year),
            other => other
                .parse::<u64>()
                .map(ComparisonRange::Days)
                .map_err(|_| RankError::Config(format!("unknown comparison range: {other}"))),
        }
    }
}

/// Outcome of a comparison run.
///
/// A missing snapshot leaves its side `None`; `delta` is only computed when
/// both sides were found.
#[derive(Debug, Default)]
pub struct Comparison {
    pub current: Option<DecodedCollection>,
    pub baseline: Option<DecodedCollection>,
    pub delta: Option<DeltaCollection>,
    pub current_captured_at: Option<CapturedAt>,
    pub baseline_captured_at: Option<CapturedAt>,
}

impl Comparison {
    /// Load `scope` on `date` and `range` days earlier, and diff them.
    ///
    /// Missing snapshots are not errors. A malformed one aborts the run.
    pub fn load(
        store: &SnapshotStore,
        date: SnapshotDate,
        range: ComparisonRange,
        scope: &SnapshotScope,
        config: &DeltaConfig,
    ) -> Result<Self> {
        let baseline_date = date.days_before(range.days())?;
        let mut comparison = Comparison::default();

        let Some(current) = store.load(date, scope)? else {
            tracing::info!(
                target: "rankdiff::pipeline",
                date = %date,
                country = %scope.country,
                variant = %scope.variant,
                "no current snapshot, nothing to compare"
            );
            return Ok(comparison);
        };
        comparison.current_captured_at = Some(current.captured_at);
        let current = decode(&current)?;

        if let Some(baseline) = store.load(baseline_date, scope)? {
            comparison.baseline_captured_at = Some(baseline.captured_at);
            let baseline = decode(&baseline)?;
            comparison.delta = Some(compare(&current, &baseline, config));
            comparison.baseline = Some(baseline);
        } else {
            tracing::info!(
                target: "rankdiff::pipeline",
                date = %baseline_date,
                range = %range,
                "no baseline snapshot, delta skipped"
            );
        }

        comparison.current = Some(current);
        Ok(comparison)
    }

    /// True when both snapshots were found and a delta exists.
    pub fn is_complete(&self) -> bool {
        self.delta.is_some()
    }
}
