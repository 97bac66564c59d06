//! Integration tests for the SQLite storage engine: roundtrips for every
//! table family, restart survival, and concurrent access through the
//! write mutex + read pool.

use std::sync::Arc;

use chrono::{Duration, Utc};

use glint_core::models::{
    EmbeddingRecord, FeedbackEvent, HistoryEntry, Pattern, TierKind, TierUsageRecord,
};
use glint_core::traits::IExpenseStore;
use glint_storage::migrations::LATEST_VERSION;
use glint_storage::StorageEngine;

fn make_pattern(key: &str, gl_code: &str) -> Pattern {
    Pattern::new(key, gl_code, 42.50)
}

// ═══════════════════════════════════════════════════════════════════════════
// PATTERNS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn pattern_roundtrip_preserves_every_field() {
    let engine = StorageEngine::open_in_memory().unwrap();

    let mut p = make_pattern("starbucks", "6400-Meals");
    p.record_occurrence(8.25);
    p.confirm_count = 7;
    p.reject_count = 2;
    p.suppressed = true;
    p.manual_override = true;
    p.reactivated_at = Some(Utc::now());
    engine.save_pattern(&p).unwrap();

    let loaded = engine.load_patterns().unwrap();
    assert_eq!(loaded.len(), 1);
    let l = &loaded[0];
    assert_eq!(l.key, "starbucks");
    assert_eq!(l.gl_code, "6400-Meals");
    assert!((l.average_amount - p.average_amount).abs() < 1e-9);
    assert_eq!(l.occurrence_count, 2);
    assert_eq!(l.confirm_count, 7);
    assert_eq!(l.reject_count, 2);
    assert!(l.suppressed);
    assert!(l.manual_override);
    assert_eq!(l.reactivated_at, p.reactivated_at);
    assert_eq!(l.created_at, p.created_at);
    assert_eq!(l.last_updated, p.last_updated);
}

#[test]
fn saving_a_pattern_twice_updates_in_place() {
    let engine = StorageEngine::open_in_memory().unwrap();

    let mut p = make_pattern("uber", "6410-Travel");
    engine.save_pattern(&p).unwrap();

    p.record_occurrence(31.00);
    p.gl_code = "6415-Rideshare".to_string();
    engine.save_pattern(&p).unwrap();

    let loaded = engine.load_patterns().unwrap();
    assert_eq!(loaded.len(), 1, "upsert must not create a second row");
    assert_eq!(loaded[0].gl_code, "6415-Rideshare");
    assert_eq!(loaded[0].occurrence_count, 2);
    assert_eq!(loaded[0].created_at, p.created_at);
}

#[test]
fn delete_pattern_reports_whether_it_existed() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .save_pattern(&make_pattern("delta", "6410-Travel"))
        .unwrap();

    assert!(engine.delete_pattern("delta").unwrap());
    assert!(!engine.delete_pattern("delta").unwrap(), "second delete finds nothing");
    assert!(engine.load_patterns().unwrap().is_empty());
}

#[test]
fn replace_patterns_swaps_the_whole_set() {
    let engine = StorageEngine::open_in_memory().unwrap();
    for key in ["alpha", "beta", "gamma"] {
        engine.save_pattern(&make_pattern(key, "6000-Misc")).unwrap();
    }

    let rebuilt = vec![
        make_pattern("delta", "6100-Software"),
        make_pattern("epsilon", "6200-Hardware"),
    ];
    engine.replace_patterns(&rebuilt).unwrap();

    let loaded = engine.load_patterns().unwrap();
    let keys: Vec<&str> = loaded.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["delta", "epsilon"], "old set must be gone, new set sorted by key");
}

// ═══════════════════════════════════════════════════════════════════════════
// FEEDBACK LOG
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn feedback_log_returns_events_in_recorded_order() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let base = Utc::now();

    // Append out of chronological order; the log sorts by recorded_at.
    let mut second = FeedbackEvent::new("starbucks", "6400-Meals", "6400-Meals");
    second.recorded_at = base + Duration::seconds(10);
    let mut first = FeedbackEvent::new("starbucks", "6400-Meals", "6420-Entertainment");
    first.recorded_at = base;
    engine.append_feedback(&second).unwrap();
    engine.append_feedback(&first).unwrap();

    let log = engine.load_feedback().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].id, first.id);
    assert_eq!(log[1].id, second.id);
    assert_eq!(log[0].actual_gl_code, "6420-Entertainment");
    assert_eq!(log[0].kind, first.kind);
    assert_eq!(log[0].recorded_at, first.recorded_at);
}

// ═══════════════════════════════════════════════════════════════════════════
// HISTORY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn confirm_history_touches_only_matching_unconfirmed_rows() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .append_history(&HistoryEntry::new("starbucks", "STARBUCKS #4521", 5.75, "6400-Meals", false))
        .unwrap();
    engine
        .append_history(&HistoryEntry::new("starbucks", "STARBUCKS #0099", 6.10, "6400-Meals", false))
        .unwrap();
    engine
        .append_history(&HistoryEntry::new("starbucks", "STARBUCKS GIFT", 25.00, "6900-Gifts", false))
        .unwrap();

    let changed = engine.confirm_history("starbucks", "6400-Meals").unwrap();
    assert_eq!(changed, 2);

    let confirmed = engine.confirmed_history().unwrap();
    assert_eq!(confirmed.len(), 2);
    assert!(confirmed.iter().all(|e| e.gl_code == "6400-Meals" && e.confirmed));

    // Confirming again finds nothing left to touch.
    assert_eq!(engine.confirm_history("starbucks", "6400-Meals").unwrap(), 0);
}

#[test]
fn correct_history_rewrites_the_code_and_confirms() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .append_history(&HistoryEntry::new("uber", "UBER TRIP 8812", 23.40, "6400-Meals", false))
        .unwrap();

    let changed = engine.correct_history("uber", "6400-Meals", "6410-Travel").unwrap();
    assert_eq!(changed, 1);

    let confirmed = engine.confirmed_history().unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].gl_code, "6410-Travel");
    assert_eq!(confirmed[0].description, "UBER TRIP 8812");
    assert!(confirmed[0].confirmed);
}

// ═══════════════════════════════════════════════════════════════════════════
// EMBEDDINGS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn embedding_vectors_roundtrip_bit_exact() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let vector = vec![0.1_f32, -0.25, 1.0e-7, f32::MIN_POSITIVE, 0.999_999];
    let record = EmbeddingRecord::new("starbucks", "6400-Meals", vector.clone());
    engine.save_embedding(&record).unwrap();

    let loaded = engine.load_embeddings().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, record.id);
    assert_eq!(loaded[0].key, "starbucks");
    assert_eq!(loaded[0].gl_code, "6400-Meals");
    assert_eq!(loaded[0].vector, vector, "f32 blobs must roundtrip exactly");
    assert_eq!(loaded[0].created_at, record.created_at);
}

#[test]
fn saving_an_embedding_for_the_same_key_replaces_it() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .save_embedding(&EmbeddingRecord::new("uber", "6400-Meals", vec![1.0, 0.0]))
        .unwrap();
    let corrected = EmbeddingRecord::new("uber", "6410-Travel", vec![0.0, 1.0]);
    engine.save_embedding(&corrected).unwrap();

    let loaded = engine.load_embeddings().unwrap();
    assert_eq!(loaded.len(), 1, "one vector per key");
    assert_eq!(loaded[0].id, corrected.id);
    assert_eq!(loaded[0].gl_code, "6410-Travel");
    assert_eq!(loaded[0].vector, vec![0.0, 1.0]);
}

#[test]
fn replace_embeddings_swaps_the_whole_index() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .save_embedding(&EmbeddingRecord::new("old-vendor", "6000-Misc", vec![1.0]))
        .unwrap();

    let rebuilt = vec![
        EmbeddingRecord::new("vendor-a", "6100-Software", vec![0.6, 0.8]),
        EmbeddingRecord::new("vendor-b", "6200-Hardware", vec![0.8, 0.6]),
    ];
    engine.replace_embeddings(&rebuilt).unwrap();

    let loaded = engine.load_embeddings().unwrap();
    let keys: Vec<&str> = loaded.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["vendor-a", "vendor-b"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// USAGE RECORDS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn usage_since_filters_by_cutoff() {
    let engine = StorageEngine::open_in_memory().unwrap();

    let mut stale = TierUsageRecord::new(TierKind::Remote, 840.0, 1.0, true);
    stale.recorded_at = Utc::now() - Duration::hours(2);
    engine.append_usage(&stale).unwrap();

    let fresh = TierUsageRecord::new(TierKind::Exact, 0.4, 0.0, true);
    engine.append_usage(&fresh).unwrap();

    let window = engine.usage_since(Utc::now() - Duration::hours(1)).unwrap();
    assert_eq!(window.len(), 1, "records older than the cutoff stay out");
    assert_eq!(window[0].tier, TierKind::Exact);
    assert!((window[0].latency_ms - 0.4).abs() < 1e-9);
    assert!((window[0].cost_units - 0.0).abs() < 1e-9);
    assert!(window[0].success);

    let all = engine.usage_since(Utc::now() - Duration::hours(3)).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].tier, TierKind::Remote, "oldest first");
}

// ═══════════════════════════════════════════════════════════════════════════
// CONCURRENCY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn concurrent_writers_all_land() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("concurrent.db");
    let engine = Arc::new(StorageEngine::open(&db_path).unwrap());

    let mut handles = vec![];
    for t in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(std::thread::spawn(move || {
            for i in 0..25 {
                engine
                    .save_pattern(&make_pattern(&format!("vendor-{t}-{i}"), "6000-Misc"))
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().expect("writer thread should not panic");
    }

    assert_eq!(engine.load_patterns().unwrap().len(), 100);
}

#[test]
fn reads_proceed_while_a_writer_runs() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("mixed.db");
    let engine = Arc::new(StorageEngine::open(&db_path).unwrap());

    for i in 0..10 {
        engine
            .save_pattern(&make_pattern(&format!("seed-{i}"), "6000-Misc"))
            .unwrap();
    }

    let mut readers = vec![];
    for _ in 0..4 {
        let engine = Arc::clone(&engine);
        readers.push(std::thread::spawn(move || {
            for _ in 0..10 {
                let loaded = engine.load_patterns().unwrap();
                assert!(loaded.len() >= 10, "seed rows must always be visible");
            }
        }));
    }

    let writer_engine = Arc::clone(&engine);
    let writer = std::thread::spawn(move || {
        for i in 10..20 {
            writer_engine
                .save_pattern(&make_pattern(&format!("seed-{i}"), "6000-Misc"))
                .unwrap();
        }
    });

    writer.join().expect("writer should not panic");
    for reader in readers {
        reader.join().expect("reader should not panic");
    }

    assert_eq!(engine.load_patterns().unwrap().len(), 20);
}

// ═══════════════════════════════════════════════════════════════════════════
// PERSISTENCE & SCHEMA
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn data_survives_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("survive.db");

    let pattern = make_pattern("starbucks", "6400-Meals");
    let record = EmbeddingRecord::new("starbucks", "6400-Meals", vec![0.6, 0.8]);

    // Session 1: write, then drop the engine to close connections.
    {
        let engine = StorageEngine::open(&db_path).unwrap();
        engine.save_pattern(&pattern).unwrap();
        engine.save_embedding(&record).unwrap();
        engine
            .append_history(&HistoryEntry::new("starbucks", "STARBUCKS #4521", 5.75, "6400-Meals", true))
            .unwrap();
    }

    // Session 2: everything written must come back.
    {
        let engine = StorageEngine::open(&db_path).unwrap();
        assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);

        let patterns = engine.load_patterns().unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].key, "starbucks");

        let embeddings = engine.load_embeddings().unwrap();
        assert_eq!(embeddings.len(), 1);
        assert_eq!(embeddings[0].vector, vec![0.6, 0.8]);

        let confirmed = engine.confirmed_history().unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].description, "STARBUCKS #4521");
    }

    dir.close().unwrap();
}

#[test]
fn reopening_does_not_rerun_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("migrate-once.db");

    {
        let engine = StorageEngine::open(&db_path).unwrap();
        assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
        engine.save_pattern(&make_pattern("keep", "6000-Misc")).unwrap();
    }
    {
        let engine = StorageEngine::open(&db_path).unwrap();
        assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
        assert_eq!(engine.load_patterns().unwrap().len(), 1, "reopen must not wipe tables");
    }

    dir.close().unwrap();
}

#[test]
fn wal_mode_active_on_file_db() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("wal-check.db");
    let engine = StorageEngine::open(&db_path).unwrap();

    let ok = engine
        .pool()
        .writer
        .with_conn_sync(glint_storage::pool::pragmas::verify_wal_mode)
        .unwrap();
    assert!(ok, "WAL mode must be active on file-backed DB");

    drop(engine);
    dir.close().unwrap();
}

#[test]
fn in_memory_engine_supports_the_full_surface() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);

    engine.save_pattern(&make_pattern("starbucks", "6400-Meals")).unwrap();
    engine
        .append_feedback(&FeedbackEvent::new("starbucks", "6400-Meals", "6400-Meals"))
        .unwrap();
    engine
        .append_usage(&TierUsageRecord::new(TierKind::Exact, 0.2, 0.0, true))
        .unwrap();

    assert_eq!(engine.load_patterns().unwrap().len(), 1);
    assert_eq!(engine.load_feedback().unwrap().len(), 1);
    assert_eq!(
        engine.usage_since(Utc::now() - Duration::minutes(5)).unwrap().len(),
        1
    );
}
