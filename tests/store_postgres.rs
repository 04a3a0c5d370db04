//! Integration tests for the Postgres term store.
//!
//! Requires a reachable database. Run with:
//! DATABASE_URL="postgresql://localhost:5432/slang" cargo test --test store_postgres -- --ignored
use std::time::{SystemTime, UNIX_EPOCH};

use slang::database::{PostgresSlangStore, SlangStore, StoreError, init_postgres};

async fn store() -> PostgresSlangStore {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    PostgresSlangStore::new(init_postgres(&database_url).await)
}

// Unique per run so reruns do not trip over rows left behind.
fn fresh_term(label: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{label}-{nanos}")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn insert_then_find_round_trips() {
    let store = store().await;
    let term = fresh_term("rizz");

    let inserted = store.insert_new(&term, "Charisma.").await.unwrap();
    assert_eq!(inserted.count, 1);

    let found = store.find(&term).await.unwrap().unwrap();
    assert_eq!(found.term, term);
    assert_eq!(found.meaning, "Charisma.");
    assert_eq!(found.count, 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn find_miss_is_none() {
    let store = store().await;

    assert!(store.find(&fresh_term("missing")).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn upsert_hit_increments_and_returns_updated_row() {
    let store = store().await;
    let term = fresh_term("bet");

    store.insert_new(&term, "Agreement.").await.unwrap();

    let updated = store.upsert_hit(&term).await.unwrap();
    assert_eq!(updated.count, 2);
    assert_eq!(updated.meaning, "Agreement.");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn upsert_hit_on_unknown_term_is_term_missing() {
    let store = store().await;

    let result = store.upsert_hit(&fresh_term("unknown")).await;

    assert!(matches!(result, Err(StoreError::TermMissing)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_insert_is_conflict() {
    let store = store().await;
    let term = fresh_term("mid");

    store.insert_new(&term, "Mediocre.").await.unwrap();

    let result = store.insert_new(&term, "Mediocre again.").await;

    assert!(matches!(result, Err(StoreError::Conflict)));

    // The losing row never landed and the original is untouched.
    let found = store.find(&term).await.unwrap().unwrap();
    assert_eq!(found.meaning, "Mediocre.");
    assert_eq!(found.count, 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn list_all_orders_by_count_descending() {
    let store = store().await;
    let low = fresh_term("a-low");
    let high = fresh_term("b-high");

    store.insert_new(&low, "Low traffic.").await.unwrap();
    store.insert_new(&high, "High traffic.").await.unwrap();
    store.upsert_hit(&high).await.unwrap();
    store.upsert_hit(&high).await.unwrap();

    let all = store.list_all().await.unwrap();
    let position = |t: &str| all.iter().position(|s| s.term == t).unwrap();

    assert!(position(&high) < position(&low));
    for pair in all.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
}
