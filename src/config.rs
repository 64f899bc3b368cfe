//! Per-dataset field semantics for the delta engine.
//!
//! Which fields flip sign and which are copied rather than diffed differs
//! between rankings and pp-records snapshots, so both sets are supplied
//! per [`DatasetKind`]. A builtin profile file ships with the crate; a
//! different one can be pointed to with `RANKDIFF_PROFILES_PATH`.

use crate::error::{RankError, Result};
use crate::types::DatasetKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const BUILTIN_PROFILES: &str = include_str!("data/profiles.json");

/// Environment variable naming an override profile file.
pub const PROFILES_PATH_ENV: &str = "RANKDIFF_PROFILES_PATH";

/// Field semantics for diffing one dataset kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaConfig {
    /// Field holding the record's identity. Copied, never diffed.
    pub identity_key: String,

    /// Lower-is-better fields; their delta is `baseline - current`.
    #[serde(default)]
    pub inverted: BTreeSet<String>,

    /// Fields copied verbatim from the current record.
    #[serde(default)]
    pub descriptive: BTreeSet<String>,
}

impl DeltaConfig {
    pub fn new(identity_key: impl Into<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            inverted: BTreeSet::new(),
            descriptive: BTreeSet::new(),
        }
    }

    pub fn with_inverted<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inverted.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_descriptive<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptive.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn is_inverted(&self, field: &str) -> bool {
        self.inverted.contains(field)
    }

    /// Descriptive fields and the identity field are copied, not diffed.
    pub fn is_copied(&self, field: &str) -> bool {
        field == self.identity_key || self.descriptive.contains(field)
    }

    fn validate(&self, kind: DatasetKind) -> Result<()> {
        if self.identity_key.is_empty() {
            return Err(RankError::Config(format!(
                "profile {} has an empty identity_key",
                kind
            )));
        }
        if let Some(field) = self.inverted.intersection(&self.descriptive).next() {
            return Err(RankError::Config(format!(
                "profile {}: field {} is both inverted and descriptive",
                kind, field
            )));
        }
        Ok(())
    }
}

/// Delta configuration for every dataset kind the caller handles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profiles {
    profiles: BTreeMap<DatasetKind, DeltaConfig>,
}

impl Profiles {
    /// Profiles compiled into the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PROFILES)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let profiles: Profiles =
            serde_json::from_str(raw).map_err(|e| RankError::Config(e.to_string()))?;
        for (kind, config) in &profiles.profiles {
            config.validate(*kind)?;
        }
        Ok(profiles)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RankError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Load from `RANKDIFF_PROFILES_PATH` if set, the builtin file otherwise.
    ///
    /// An override that fails to load is an error, not a silent fallback.
    pub fn load_from_env() -> Result<Self> {
        match env::var(PROFILES_PATH_ENV).ok().map(PathBuf::from) {
            Some(path) => {
                let profiles = Self::from_file(&path)?;
                tracing::info!(
                    target: "rankdiff::config",
                    path = %path.display(),
                    "profiles.loaded=file"
                );
                Ok(profiles)
            }
            None => {
                let profiles = Self::builtin()?;
                tracing::info!(target: "rankdiff::config", "profiles.loaded=builtin");
                Ok(profiles)
            }
        }
    }

    pub fn insert(&mut self, kind: DatasetKind, config: DeltaConfig) {
        self.profiles.insert(kind, config);
    }

    pub fn get(&self, kind: DatasetKind) -> Option<&DeltaConfig> {
        self.profiles.get(&kind)
    }

    /// The profile for `kind`, or a configuration error if none is defined.
    pub fn require(&self, kind: DatasetKind) -> Result<&DeltaConfig> {
        self.get(kind).ok_or_else(|| {
            RankError::Config(format!("no field profile defined for dataset kind {}", kind))
        })
    }

    /// Check at startup that every kind the caller will process has a profile.
    pub fn validate(&self, kinds: &[DatasetKind]) -> Result<()> {
        for kind in kinds {
            self.require(*kind)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let profiles = Profiles::builtin().unwrap();
        profiles
            .validate(&[DatasetKind::Rankings, DatasetKind::PpRecords])
            .unwrap();

        let rankings = profiles.require(DatasetKind::Rankings).unwrap();
        assert_eq!(rankings.identity_key, "id");
        assert!(rankings.is_inverted("country_rank"));
        assert!(rankings.is_inverted("global_rank"));
        assert!(rankings.is_copied("ign"));
        assert!(!rankings.is_copied("pp"));
    }

    #[test]
    fn test_missing_profile_is_config_error() {
        let profiles = Profiles::from_json(
            r#"{"rankings": {"identity_key": "id", "inverted": ["country_rank"]}}"#,
        )
        .unwrap();
        let result = profiles.validate(&[DatasetKind::Rankings, DatasetKind::PpRecords]);
        assert!(matches!(result, Err(RankError::Config(_))));
    }

    #[test]
    fn test_overlapping_sets_rejected() {
        let result = Profiles::from_json(
            r#"{"rankings": {"identity_key": "id", "inverted": ["ign"], "descriptive": ["ign"]}}"#,
        );
        assert!(matches!(result, Err(RankError::Config(_))));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = Profiles::from_json(r#"{"replays": {"identity_key": "id"}}"#);
        assert!(matches!(result, Err(RankError::Config(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = Profiles::from_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(RankError::ConfigRead { .. })));
    }
}
