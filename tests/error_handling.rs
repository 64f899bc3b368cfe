//! Error handling and edge case tests.

use rankdiff::{
    compare, decode, rank, top_record, Comparison, ComparisonRange, DatasetKind,
    DecodedCollection, DeltaConfig, FieldValue, GameVariant, Profiles, RankError, Snapshot,
    SnapshotDate, SnapshotScope, SnapshotStore, StoreConfig,
};
use std::fs;
use tempfile::TempDir;

fn test_store(dir: &TempDir) -> SnapshotStore {
    SnapshotStore::open(StoreConfig {
        path: dir.path().join("data"),
        pretty: false,
        create_if_missing: true,
    })
    .unwrap()
}

// --- Snapshot Errors ---

#[test]
fn test_malformed_snapshot_aborts_comparison() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    let today = SnapshotDate::from_ymd(2024, 1, 1).unwrap();
    let scope = SnapshotScope::rankings("JP", GameVariant::Osu);

    let path = store.path_for(today, &scope);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        br#"{"schema_version": 1, "captured_at": 0, "country": "JP", "variant": "osu",
            "field_names": ["ign", "pp"], "identity_key": "id",
            "records": {"1": ["a", 10], "2": ["b"]}}"#,
    )
    .unwrap();

    let result = Comparison::load(
        &store,
        today,
        ComparisonRange::Yesterday,
        &scope,
        &DeltaConfig::new("id"),
    );
    assert!(matches!(
        result,
        Err(RankError::MalformedSnapshot { ref key, expected: 2, got: 1 }) if key == "2"
    ));
}

#[test]
fn test_one_scope_failing_leaves_others_alone() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    let today = SnapshotDate::from_ymd(2024, 1, 1).unwrap();

    let broken = SnapshotScope::rankings("JP", GameVariant::Osu);
    let path = store.path_for(today, &broken);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"[]").unwrap();

    let healthy = SnapshotScope::rankings("PH", GameVariant::Osu);
    let mut snapshot = Snapshot::new(healthy.clone(), 1.0, vec!["pp".into()], "id");
    snapshot.push_record("1", vec![FieldValue::Int(5)]).unwrap();
    store.save(&snapshot, today).unwrap();

    let config = DeltaConfig::new("id");
    assert!(Comparison::load(&store, today, ComparisonRange::Yesterday, &broken, &config).is_err());
    let ok = Comparison::load(&store, today, ComparisonRange::Yesterday, &healthy, &config).unwrap();
    assert!(ok.current.is_some());
}

#[test]
fn test_unknown_variant_in_file() {
    let raw = br#"{"captured_at": 0, "variant": "piano", "field_names": [], "records": {}}"#;
    assert!(matches!(
        Snapshot::from_json(raw),
        Err(RankError::Deserialization(_))
    ));
}

#[test]
fn test_empty_snapshot_decodes_empty() {
    let snapshot = Snapshot::new(
        SnapshotScope::rankings("PH", GameVariant::Mania),
        1.0,
        vec!["pp".into()],
        "id",
    );
    let decoded = decode(&snapshot).unwrap();
    assert!(decoded.is_empty());
    assert!(compare(&decoded, &decoded, &DeltaConfig::new("id")).is_empty());
    assert!(rank(&decoded, "pp", true).is_empty());
}

// --- Ranking Errors ---

#[test]
fn test_top_record_on_empty_collection() {
    let empty = DecodedCollection::new();
    let result = top_record(&empty, "pp", true);
    assert!(matches!(result, Err(RankError::NoQualifyingRecord { .. })));
}

// --- Configuration Errors ---

#[test]
fn test_missing_profile_fails_validation() {
    let profiles = Profiles::from_json(r#"{"pp-records": {"identity_key": "score_id"}}"#).unwrap();
    let result = profiles.validate(&[DatasetKind::Rankings]);
    assert!(matches!(result, Err(RankError::Config(_))));
}

#[test]
fn test_malformed_profile_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profiles.json");
    fs::write(&path, b"{\"rankings\": {\"inverted\": []}}").unwrap();

    let result = Profiles::from_file(&path);
    assert!(matches!(result, Err(RankError::Config(_))));
}

#[test]
fn test_invalid_date_string() {
    assert!(matches!(
        "2024/13/01".parse::<SnapshotDate>(),
        Err(RankError::InvalidDate(_))
    ));
    assert!(matches!(
        SnapshotDate::from_ymd(2023, 2, 29),
        Err(RankError::InvalidDate(_))
    ));
}
