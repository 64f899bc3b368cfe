//! Delta engine.
//!
//! Aligns a current and a baseline collection by identity key and turns
//! every current record into a [`DeltaRecord`] where a positive number is
//! always an improvement. Field semantics come from a
//! [`DeltaConfig`](crate::config::DeltaConfig) supplied by the caller.

mod engine;

pub use engine::{compare, DeltaCollection, DeltaRecord, NEW_ENTRY_KEY};
