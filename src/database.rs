//! # Postgres
//!
//! Relational store for cached definitions.
//!
//! ## Schema
//!
//! One table, `slangs`:
//! - `term` (**text**, primary key): exact, case-sensitive lookup key
//! - `meaning` (**text**): definition as returned by the provider
//! - `count` (**bigint** >= 1): searches that resolved this term
//!
//! ## Invariants
//!
//! - One row per distinct term, enforced by the primary key
//! - `count` starts at 1 on insert and only ever goes up by 1, in the database
//! - Rows are never deleted; there is no expiry
//!
//! The find-then-insert path is not transactional. Two first searches for
//! the same term can race, so the losing insert surfaces as
//! [`StoreError::Conflict`] and the caller retries as a hit.
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{PgPool, postgres::PgPoolOptions};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Slang {
    pub term: String,
    pub meaning: String,
    pub count: i64,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("term already stored")]
    Conflict,

    #[error("term not stored")]
    TermMissing,

    #[error("storage unreachable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Term Store contract. One implementation talks to Postgres; tests swap in
/// an in-memory map.
#[async_trait]
pub trait SlangStore: Send + Sync {
    /// Exact-match lookup. A miss is `Ok(None)`, not an error.
    async fn find(&self, term: &str) -> Result<Option<Slang>, StoreError>;

    /// Increments the count of an existing term by 1 and returns the updated
    /// row. [`StoreError::TermMissing`] when the term is not stored.
    async fn upsert_hit(&self, term: &str) -> Result<Slang, StoreError>;

    /// Creates a row with `count = 1`. [`StoreError::Conflict`] when the term
    /// is already stored (lost a concurrent-insert race).
    async fn insert_new(&self, term: &str, meaning: &str) -> Result<Slang, StoreError>;

    /// Snapshot of every row, count descending, ties by term ascending.
    async fn list_all(&self) -> Result<Vec<Slang>, StoreError>;
}

const CREATE_SLANGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS slangs (
        term TEXT PRIMARY KEY,
        meaning TEXT NOT NULL,
        count BIGINT NOT NULL DEFAULT 1 CHECK (count >= 1)
    )
";

pub async fn init_postgres(database_url: &str) -> PgPool {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .unwrap();

    sqlx::query(CREATE_SLANGS_TABLE).execute(&pool).await.unwrap();

    pool
}

pub struct PostgresSlangStore {
    pool: PgPool,
}

impl PostgresSlangStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlangStore for PostgresSlangStore {
    async fn find(&self, term: &str) -> Result<Option<Slang>, StoreError> {
        let row = sqlx::query_as::<_, Slang>(
            "SELECT term, meaning, count FROM slangs WHERE term = $1",
        )
        .bind(term)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_hit(&self, term: &str) -> Result<Slang, StoreError> {
        sqlx::query_as::<_, Slang>(
            "UPDATE slangs SET count = count + 1 WHERE term = $1
             RETURNING term, meaning, count",
        )
        .bind(term)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::TermMissing)
    }

    async fn insert_new(&self, term: &str, meaning: &str) -> Result<Slang, StoreError> {
        sqlx::query_as::<_, Slang>(
            "INSERT INTO slangs (term, meaning) VALUES ($1, $2)
             RETURNING term, meaning, count",
        )
        .bind(term)
        .bind(meaning)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Conflict,
            other => StoreError::Unavailable(other),
        })
    }

    async fn list_all(&self) -> Result<Vec<Slang>, StoreError> {
        let rows = sqlx::query_as::<_, Slang>(
            "SELECT term, meaning, count FROM slangs ORDER BY count DESC, term ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
