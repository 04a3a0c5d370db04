//! Term-resolution workflow: store lookup first, Gemini fallback on a miss,
//! write-back on an accepted definition.
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    database::{Slang, SlangStore, StoreError},
    error::AppError,
};

/// Meaning served when the provider has no confident definition. Never
/// persisted.
pub const NOT_FOUND_SENTINEL: &str = "Slang not found!";

/// Provider replies sometimes explain a non-meaning instead of using the
/// sentinel. Any of these substrings in the lowercased reply counts as not
/// found. The list is deliberately exact; matching is the contract, not
/// linguistic coverage.
pub const HEDGING_PHRASES: &[&str] = &[
    "doesn't mean anything",
    "no hidden meaning",
    "random string of letters",
    "slang not found!",
];

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed reply: {0}")]
    Malformed(String),
}

/// Seam to the generative-language API. The real implementation lives in
/// [`crate::gemini`]; tests script replies through this trait.
#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    async fn define(&self, term: &str) -> Result<String, ProviderError>;
}

/// Outcome of resolving a search term. Provider and storage failures travel
/// on the `Err` channel of [`Resolver::resolve`] instead.
pub enum Resolution {
    Found(Slang),
    NotFound,
}

pub enum UpsertOutcome {
    Updated(Slang),
    Added(Slang),
}

pub struct Resolver {
    store: Arc<dyn SlangStore>,
    provider: Arc<dyn DefinitionProvider>,
}

impl Resolver {
    pub fn new(store: Arc<dyn SlangStore>, provider: Arc<dyn DefinitionProvider>) -> Self {
        Self { store, provider }
    }

    /// Known terms are hits: bump the count and return the stored row.
    /// Unknown terms go to the provider; a hedged or sentinel reply resolves
    /// to [`Resolution::NotFound`] with nothing persisted, anything else is
    /// stored with count 1. No insert happens unless the full provider round
    /// trip succeeded.
    pub async fn resolve(&self, term: &str) -> Result<Resolution, AppError> {
        if self.store.find(term).await?.is_some() {
            let updated = self.store.upsert_hit(term).await?;
            return Ok(Resolution::Found(updated));
        }

        let reply = self.provider.define(term).await?;

        #[cfg(feature = "verbose")]
        tracing::info!("Provider reply for '{term}': {reply}");

        if is_not_found(&reply) {
            return Ok(Resolution::NotFound);
        }

        match self.store.insert_new(term, &reply).await {
            Ok(record) => Ok(Resolution::Found(record)),
            // Lost a first-search race; the row exists now, so count the hit.
            Err(StoreError::Conflict) => Ok(Resolution::Found(self.store.upsert_hit(term).await?)),
            Err(e) => Err(e.into()),
        }
    }

    /// Client-supplied upsert: increment when stored, insert with count 1
    /// otherwise. The stored meaning is never overwritten.
    pub async fn record(&self, term: &str, meaning: &str) -> Result<UpsertOutcome, AppError> {
        if self.store.find(term).await?.is_some() {
            return Ok(UpsertOutcome::Updated(self.store.upsert_hit(term).await?));
        }

        match self.store.insert_new(term, meaning).await {
            Ok(record) => Ok(UpsertOutcome::Added(record)),
            Err(StoreError::Conflict) => Ok(UpsertOutcome::Updated(self.store.upsert_hit(term).await?)),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn is_not_found(reply: &str) -> bool {
    let lowered = reply.to_lowercase();

    HEDGING_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}
