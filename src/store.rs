//! On-disk snapshot store.
//!
//! One JSON file per day and scope:
//! `<root>/YYYY/MM/DD/<country>-<variant>[-<kind suffix>].json`.

use crate::error::{RankError, Result};
use crate::types::{Snapshot, SnapshotDate, SnapshotScope};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Base directory holding the dated snapshot tree.
    pub path: PathBuf,

    /// Write indented JSON instead of compact JSON.
    pub pretty: bool,

    /// Whether to create the base directory if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data"),
            pretty: false,
            create_if_missing: true,
        }
    }
}

/// Reads and writes dated snapshot files.
pub struct SnapshotStore {
    config: StoreConfig,
}

impl SnapshotStore {
    /// Open the store rooted at `config.path`.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if !config.path.exists() {
            if !config.create_if_missing {
                return Err(RankError::Io(std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("store directory {} does not exist", config.path.display()),
                )));
            }
            fs::create_dir_all(&config.path)?;
        }
        Ok(Self { config })
    }

    pub fn root(&self) -> &Path {
        &self.config.path
    }

    /// File a snapshot for `date` and `scope` lives in.
    pub fn path_for(&self, date: SnapshotDate, scope: &SnapshotScope) -> PathBuf {
        let file_name = match scope.kind.file_suffix() {
            Some(suffix) => format!("{}-{}-{}.json", scope.country, scope.variant, suffix),
            None => format!("{}-{}.json", scope.country, scope.variant),
        };
        self.config
            .path
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}", date.day()))
            .join(file_name)
    }

    pub fn exists(&self, date: SnapshotDate, scope: &SnapshotScope) -> bool {
        self.path_for(date, scope).is_file()
    }

    /// Load the snapshot for `date` and `scope`.
    ///
    /// A missing file is `Ok(None)`: no capture for that day yet.
    pub fn load(&self, date: SnapshotDate, scope: &SnapshotScope) -> Result<Option<Snapshot>> {
        let path = self.path_for(date, scope);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    target: "rankdiff::store",
                    path = %path.display(),
                    "snapshot missing"
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = Snapshot::from_json(&bytes)?;
        if snapshot.scope() != *scope {
            tracing::warn!(
                target: "rankdiff::store",
                path = %path.display(),
                country = %snapshot.country,
                variant = %snapshot.variant,
                kind = %snapshot.kind,
                "snapshot header disagrees with its file location"
            );
        }

        tracing::debug!(
            target: "rankdiff::store",
            path = %path.display(),
            records = snapshot.records.len(),
            "snapshot loaded"
        );
        Ok(Some(snapshot))
    }

    /// Like [`load`](Self::load), but a missing file is an error.
    pub fn load_required(&self, date: SnapshotDate, scope: &SnapshotScope) -> Result<Snapshot> {
        self.load(date, scope)?
            .ok_or_else(|| RankError::SnapshotNotFound {
                path: self.path_for(date, scope),
            })
    }

    /// Write `snapshot` as the capture for `date`, replacing any existing file.
    ///
    /// The file is written next to its destination and renamed into place.
    pub fn save(&self, snapshot: &Snapshot, date: SnapshotDate) -> Result<PathBuf> {
        let path = self.path_for(date, &snapshot.scope());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bytes = snapshot.to_json(self.config.pretty)?;
        let tmp_path = path.with_extension("json.tmp");
        let written = write_synced(&tmp_path, &bytes).and_then(|()| fs::rename(&tmp_path, &path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        target: "rankdiff::store",
                        path = %tmp_path.display(),
                        error = %cleanup,
                        "failed to remove temporary snapshot file"
                    );
                }
            }
            return Err(e.into());
        }

        tracing::info!(
            target: "rankdiff::store",
            path = %path.display(),
            records = snapshot.records.len(),
            "snapshot saved"
        );
        Ok(path)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
