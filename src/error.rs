//! Error types for snapshot loading, diffing and ranking.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rankdiff operations.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot not found: {}", path.display())]
    SnapshotNotFound { path: PathBuf },

    #[error("Malformed snapshot: record {key} has {got} values, expected {expected}")]
    MalformedSnapshot {
        key: String,
        expected: usize,
        got: usize,
    },

    #[error("No record qualifies for field {field}")]
    NoQualifyingRecord { field: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read configuration from {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Field {field} is not {expected}")]
    FieldType { field: String, expected: &'static str },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown game variant: {0}")]
    UnknownVariant(String),

    #[error("Unknown dataset kind: {0}")]
    UnknownKind(String),
}

impl From<serde_json::Error> for RankError {
    fn from(e: serde_json::Error) -> Self {
        RankError::Deserialization(e.to_string())
    }
}

/// Result type for rankdiff operations.
pub type Result<T> = std::result::Result<T, RankError>;
