//! Unit tests for the quote queries.

use rusqlite::Connection;

use crate::error::StoreError;
use crate::quote::{
    create_quote, get_quote_by_id, increment_likes, likes_threshold, list_quotes,
    list_quotes_with_likes_at_least, quote_stats, QuoteStats,
};
use crate::store::QuoteStore;

/// Creates an in-memory SQLite database with migrations applied.
fn test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("should open in-memory db");
    quotebox_db::run_migrations(&conn).expect("migrations should succeed");
    conn
}

/// Inserts quotes with the given like counts, returning their ids.
fn seed_likes(conn: &Connection, likes: &[i64]) -> Vec<i64> {
    likes
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            conn.execute(
                "INSERT INTO quotes (name, quote, likes) VALUES (?1, ?2, ?3)",
                rusqlite::params![format!("author-{i}"), format!("quote-{i}"), n],
            )
            .expect("should insert quote");
            conn.last_insert_rowid()
        })
        .collect()
}

// ── likes_threshold ──────────────────────────────────────────────────

#[test]
fn threshold_rounds_up() {
    assert_eq!(likes_threshold(Some(10)), 8);
    assert_eq!(likes_threshold(Some(4)), 3);
    assert_eq!(likes_threshold(Some(1)), 1);
    assert_eq!(likes_threshold(Some(5)), 4);
}

#[test]
fn threshold_handles_extreme_like_counts() {
    assert_eq!(likes_threshold(Some(i64::MAX)), i64::MAX - i64::MAX / 4);
    assert!(likes_threshold(Some(i64::MAX)) > 0);
}

#[test]
fn threshold_of_empty_table_is_zero() {
    assert_eq!(likes_threshold(None), 0);
    assert_eq!(likes_threshold(Some(0)), 0);
}

#[test]
fn threshold_never_exceeds_max() {
    for max in 0..200 {
        let threshold = likes_threshold(Some(max));
        assert!(threshold <= max, "max {max} produced threshold {threshold}");
        assert!(threshold * 4 >= max * 3, "max {max} produced threshold {threshold}");
    }
}

// ── stats ────────────────────────────────────────────────────────────

#[test]
fn stats_on_empty_table() {
    let conn = test_db();
    let stats = quote_stats(&conn).expect("stats should succeed");
    assert_eq!(
        stats,
        QuoteStats {
            count: 0,
            max_likes: None
        }
    );
}

#[test]
fn stats_reports_count_and_max() {
    let conn = test_db();
    seed_likes(&conn, &[0, 10, 8, 3]);

    let stats = quote_stats(&conn).expect("stats should succeed");
    assert_eq!(stats.count, 4);
    assert_eq!(stats.max_likes, Some(10));
}

#[test]
fn stats_serializes_max_likes_in_camel_case() {
    let json = serde_json::to_value(QuoteStats {
        count: 2,
        max_likes: None,
    })
    .unwrap();
    assert_eq!(json, serde_json::json!({"count": 2, "maxLikes": null}));
}

// ── create / get ─────────────────────────────────────────────────────

#[test]
fn create_assigns_sequential_ids_and_zero_likes() {
    let conn = test_db();

    let first = create_quote(&conn, "Ada", "Imagination is the discovering faculty")
        .expect("create should succeed");
    let second = create_quote(&conn, "Grace", "It's easier to ask forgiveness")
        .expect("create should succeed");
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    let quote = get_quote_by_id(&conn, first.id)
        .expect("lookup should succeed")
        .expect("quote should exist");
    assert_eq!(quote.name, "Ada");
    assert_eq!(quote.quote, "Imagination is the discovering faculty");
    assert_eq!(quote.likes, 0);
}

#[test]
fn get_unknown_id_is_none() {
    let conn = test_db();
    seed_likes(&conn, &[1]);

    assert!(get_quote_by_id(&conn, 42).unwrap().is_none());
    assert!(get_quote_by_id(&conn, 0).unwrap().is_none());
    assert!(get_quote_by_id(&conn, -3).unwrap().is_none());
}

#[test]
fn quote_serializes_with_plain_field_names() {
    let conn = test_db();
    let created = create_quote(&conn, "Ada", "Hello").unwrap();
    let quote = get_quote_by_id(&conn, created.id).unwrap().unwrap();

    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"id": 1, "name": "Ada", "quote": "Hello", "likes": 0})
    );
}

// ── listing ──────────────────────────────────────────────────────────

#[test]
fn list_quotes_returns_everything() {
    let conn = test_db();
    let ids = seed_likes(&conn, &[0, 5, 2]);

    let mut listed: Vec<i64> = list_quotes(&conn).unwrap().iter().map(|q| q.id).collect();
    listed.sort_unstable();
    assert_eq!(listed, ids);
}

#[test]
fn popular_candidates_match_threshold() {
    let conn = test_db();
    seed_likes(&conn, &[0, 10, 8, 3]);

    let stats = quote_stats(&conn).unwrap();
    let threshold = likes_threshold(stats.max_likes);
    assert_eq!(threshold, 8);

    let mut likes: Vec<i64> = list_quotes_with_likes_at_least(&conn, threshold)
        .unwrap()
        .iter()
        .map(|q| q.likes)
        .collect();
    likes.sort_unstable();
    assert_eq!(likes, vec![8, 10]);
}

#[test]
fn zero_threshold_returns_all_quotes() {
    let conn = test_db();
    seed_likes(&conn, &[0, 0, 0]);

    let all = list_quotes_with_likes_at_least(&conn, 0).unwrap();
    assert_eq!(all.len(), 3);
}

// ── likes ────────────────────────────────────────────────────────────

#[test]
fn increment_adds_exactly_one() {
    let conn = test_db();
    let created = create_quote(&conn, "Ada", "Hello").unwrap();

    for _ in 0..5 {
        assert_eq!(increment_likes(&conn, created.id).unwrap(), 1);
    }

    let quote = get_quote_by_id(&conn, created.id).unwrap().unwrap();
    assert_eq!(quote.likes, 5);
}

#[test]
fn increment_unknown_id_is_a_noop() {
    let conn = test_db();
    let created = create_quote(&conn, "Ada", "Hello").unwrap();

    assert_eq!(increment_likes(&conn, 999).unwrap(), 0);

    let quote = get_quote_by_id(&conn, created.id).unwrap().unwrap();
    assert_eq!(quote.likes, 0);
}

// ── QuoteStore ───────────────────────────────────────────────────────

#[test]
fn open_without_binding_fails_fast() {
    let err = QuoteStore::open(None, Default::default()).expect_err("should fail");
    assert!(matches!(err, StoreError::MissingBinding));

    let err = QuoteStore::open(Some("   "), Default::default()).expect_err("should fail");
    assert!(matches!(err, StoreError::MissingBinding));
}

#[test]
fn store_round_trips_through_pool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    let store = QuoteStore::open(path.to_str(), Default::default()).expect("open should succeed");

    let created = store.create_quote("Ada", "Hello").unwrap();
    assert_eq!(store.increment_likes(created.id).unwrap(), 1);

    let quote = store.quote_by_id(created.id).unwrap().unwrap();
    assert_eq!(quote.likes, 1);

    let stats = store.stats().unwrap();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.max_likes, Some(1));

    assert_eq!(store.all_quotes().unwrap(), vec![quote.clone()]);
    assert!(store.quotes_with_likes_at_least(2).unwrap().is_empty());
    assert_eq!(store.quotes_with_likes_at_least(1).unwrap(), vec![quote]);
}
