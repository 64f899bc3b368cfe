//! Integration tests: store -> decode -> compare -> rank -> report.

use rankdiff::{
    ActivityReport, Comparison, ComparisonRange, DatasetKind, FieldValue, GameVariant, Profiles,
    RankingRecord, ReportOptions, Snapshot, SnapshotDate, SnapshotScope, SnapshotStore,
    StoreConfig,
};
use serde_json::json;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn test_store(dir: &TempDir) -> SnapshotStore {
    SnapshotStore::open(StoreConfig {
        path: dir.path().join("data"),
        pretty: true,
        create_if_missing: true,
    })
    .unwrap()
}

fn player(country_rank: i64, ign: &str, pp: i64, play_count: i64) -> RankingRecord {
    RankingRecord {
        country_rank,
        global_rank: Some(country_rank * 150),
        ign: ign.to_string(),
        pp,
        acc: 97.5,
        play_count,
        rank_x: 10,
        rank_s: 100,
        rank_a: 200,
        play_time: 360_000,
        total_score: 9_000_000_000,
        ranked_score: 4_000_000_000,
        total_hits: 2_000_000,
    }
}

fn rankings_snapshot(players: &[(&str, RankingRecord)]) -> Snapshot {
    let mut snapshot = Snapshot::new(
        SnapshotScope::rankings("PH", GameVariant::Fruits),
        RankingRecord::SCHEMA_VERSION,
        RankingRecord::field_names(),
        RankingRecord::IDENTITY_KEY,
    )
    .with_pages(20);
    for (id, record) in players {
        snapshot.push_record(*id, record.to_values()).unwrap();
    }
    snapshot
}

fn rankings_profile() -> rankdiff::DeltaConfig {
    Profiles::builtin()
        .unwrap()
        .require(DatasetKind::Rankings)
        .unwrap()
        .clone()
}

// --- Realistic Workflow Tests ---

#[test]
fn test_daily_comparison_workflow() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    let today = SnapshotDate::from_ymd(2024, 6, 2).unwrap();
    let yesterday = today.days_before(1).unwrap();

    store
        .save(
            &rankings_snapshot(&[
                ("100", player(1, "alpha", 9000, 5000)),
                ("200", player(2, "bravo", 8900, 4000)),
                ("300", player(3, "charlie", 8000, 3000)),
            ]),
            yesterday,
        )
        .unwrap();
    store
        .save(
            &rankings_snapshot(&[
                ("200", player(1, "bravo", 9100, 4050)),
                ("100", player(2, "alpha", 9000, 5000)),
                ("400", player(3, "delta", 8500, 100)),
            ]),
            today,
        )
        .unwrap();

    let comparison = Comparison::load(
        &store,
        today,
        ComparisonRange::Yesterday,
        &SnapshotScope::rankings("PH", GameVariant::Fruits),
        &rankings_profile(),
    )
    .unwrap();
    assert!(comparison.is_complete());

    let delta = comparison.delta.as_ref().unwrap();
    let keys: Vec<&str> = delta.keys().collect();
    assert_eq!(keys, vec!["200", "100", "400"]);

    let bravo = delta.get("200").unwrap();
    assert!(!bravo.new_entry());
    assert_eq!(bravo.get("country_rank"), Some(&FieldValue::Int(1)));
    assert_eq!(bravo.get("global_rank"), Some(&FieldValue::Int(150)));
    assert_eq!(bravo.get("pp"), Some(&FieldValue::Int(200)));
    assert_eq!(bravo.get("play_count"), Some(&FieldValue::Int(50)));
    assert_eq!(bravo.get("ign"), Some(&FieldValue::from("bravo")));

    let alpha = delta.get("100").unwrap();
    assert_eq!(alpha.get("country_rank"), Some(&FieldValue::Int(-1)));
    assert_eq!(alpha.get("pp"), Some(&FieldValue::Int(0)));

    let newcomer = delta.get("400").unwrap();
    assert!(newcomer.new_entry());
    assert_eq!(newcomer.get("pp"), Some(&FieldValue::Int(0)));
    assert_eq!(newcomer.get("acc"), Some(&FieldValue::Float(0.0)));

    let report = ActivityReport::from_comparison(&comparison, &ReportOptions::default()).unwrap();
    let pp = report.stat("pp").unwrap();
    assert_eq!(pp.highlight.name, "bravo");
    assert_eq!(pp.summary.total, FieldValue::Int(200));

    let play_count = report.stat("play_count").unwrap();
    assert_eq!(play_count.top.len(), 1);
    assert_eq!(play_count.top[0].before, Some(FieldValue::Int(4000)));
    assert_eq!(play_count.top[0].after, Some(FieldValue::Int(4050)));

    let ranked_score = report.stat("ranked_score").unwrap();
    assert!(ranked_score.highlight.is_placeholder());

    assert_eq!(report.new_entries.len(), 1);
    assert_eq!(report.new_entries[0].name, "delta");
}

#[test]
fn test_weekly_range_reads_older_snapshot() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    let today = SnapshotDate::from_ymd(2024, 6, 8).unwrap();

    store
        .save(
            &rankings_snapshot(&[("1", player(5, "a", 1000, 10))]),
            today.days_before(7).unwrap(),
        )
        .unwrap();
    store
        .save(&rankings_snapshot(&[("1", player(2, "a", 1500, 90))]), today)
        .unwrap();

    let comparison = Comparison::load(
        &store,
        today,
        ComparisonRange::Week,
        &SnapshotScope::rankings("PH", GameVariant::Fruits),
        &rankings_profile(),
    )
    .unwrap();

    let delta = comparison.delta.unwrap();
    let a = delta.get("1").unwrap();
    assert_eq!(a.get("country_rank"), Some(&FieldValue::Int(3)));
    assert_eq!(a.get("pp"), Some(&FieldValue::Int(500)));
}

#[test]
fn test_missing_baseline_keeps_current() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    let today = SnapshotDate::from_ymd(2024, 6, 2).unwrap();
    store
        .save(&rankings_snapshot(&[("1", player(1, "a", 1000, 10))]), today)
        .unwrap();

    let comparison = Comparison::load(
        &store,
        today,
        ComparisonRange::Yesterday,
        &SnapshotScope::rankings("PH", GameVariant::Fruits),
        &rankings_profile(),
    )
    .unwrap();

    assert!(!comparison.is_complete());
    assert!(comparison.current.is_some());
    assert!(comparison.current_captured_at.is_some());
    assert!(comparison.baseline.is_none());
    assert!(comparison.baseline_captured_at.is_none());
}

#[test]
fn test_missing_current_is_empty_outcome() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);

    let comparison = Comparison::load(
        &store,
        SnapshotDate::from_ymd(2024, 6, 2).unwrap(),
        ComparisonRange::Yesterday,
        &SnapshotScope::rankings("PH", GameVariant::Fruits),
        &rankings_profile(),
    )
    .unwrap();

    assert!(comparison.current.is_none());
    assert!(comparison.delta.is_none());
}

#[test]
fn test_reads_legacy_files() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    let today = SnapshotDate::from_ymd(2024, 6, 2).unwrap();
    let scope = SnapshotScope::rankings("PH", GameVariant::Fruits);

    for (date, rank, pp) in [(today.days_before(1).unwrap(), 4, 7000), (today, 3, 7100)] {
        let legacy = json!({
            "file_version": 1.01,
            "update_date": 1717286400.25,
            "mode": "fruits",
            "country": "PH",
            "pages": 20,
            "map": ["country_rank", "global_rank", "ign", "pp", "acc"],
            "key": "id",
            "data": {"9025855": [rank, 15000, "eoneru", pp, 98.1]}
        });
        let path = store.path_for(date, &scope);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_vec(&legacy).unwrap()).unwrap();
    }

    let comparison =
        Comparison::load(&store, today, ComparisonRange::Yesterday, &scope, &rankings_profile())
            .unwrap();
    let delta = comparison.delta.unwrap();
    let player = delta.get("9025855").unwrap();
    assert_eq!(player.get("country_rank"), Some(&FieldValue::Int(1)));
    assert_eq!(player.get("pp"), Some(&FieldValue::Int(100)));
    assert_eq!(player.get("acc"), Some(&FieldValue::Float(0.0)));
}

#[test]
fn test_report_serializes_for_presentation() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    let today = SnapshotDate::from_ymd(2024, 6, 2).unwrap();
    store
        .save(
            &rankings_snapshot(&[("1", player(1, "a", 1000, 10))]),
            today.days_before(1).unwrap(),
        )
        .unwrap();
    store
        .save(&rankings_snapshot(&[("1", player(1, "a", 1010, 12))]), today)
        .unwrap();

    let comparison = Comparison::load(
        &store,
        today,
        ComparisonRange::Yesterday,
        &SnapshotScope::rankings("PH", GameVariant::Fruits),
        &rankings_profile(),
    )
    .unwrap();
    let report = ActivityReport::from_comparison(&comparison, &ReportOptions::default()).unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["stats"][0]["field"], "pp");
    assert_eq!(value["stats"][0]["highlight"]["name"], "a");
    assert_eq!(value["stats"][0]["top"][0]["gained"], 10);
    assert_eq!(value["stats"][1]["highlight"]["name"], "nobody");
    assert_eq!(value["new_entries"], json!([]));
}
