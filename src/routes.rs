use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    email::EmailRequest,
    error::AppError,
    resolver::{NOT_FOUND_SENTINEL, Resolution, UpsertOutcome},
    state::AppState,
};

#[derive(Serialize)]
pub struct TrendingSlang {
    pub term: String,
    pub count: i64,
}

#[derive(Deserialize)]
pub struct SearchParams {
    term: Option<String>,
}

#[derive(Serialize)]
pub struct SearchReply {
    pub term: String,
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    pub exists: bool,
}

#[derive(Deserialize)]
pub struct NewSlang {
    term: String,
    meaning: String,
}

pub async fn trending_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrendingSlang>>, AppError> {
    let trending = state
        .store
        .list_all()
        .await?
        .into_iter()
        .map(|slang| TrendingSlang {
            term: slang.term,
            count: slang.count,
        })
        .collect();

    Ok(Json(trending))
}

/// Not-found terms answer 200 with `exists: false`, never 404. The outcome
/// is an ordinary answer, not an error.
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchReply>, AppError> {
    let term = params
        .term
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingTerm)?;

    let reply = match state.resolver.resolve(&term).await? {
        Resolution::Found(slang) => SearchReply {
            term: slang.term,
            meaning: slang.meaning,
            count: Some(slang.count),
            exists: true,
        },
        Resolution::NotFound => SearchReply {
            term,
            meaning: NOT_FOUND_SENTINEL.to_string(),
            count: None,
            exists: false,
        },
    };

    Ok(Json(reply))
}

pub async fn upsert_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSlang>,
) -> Result<Json<Value>, AppError> {
    let message = match state
        .resolver
        .record(&payload.term, &payload.meaning)
        .await?
    {
        UpsertOutcome::Updated(_) => "Slang count updated!",
        UpsertOutcome::Added(_) => "Slang added successfully!",
    };

    Ok(Json(json!({ "message": message })))
}

pub async fn send_email_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<Value>, AppError> {
    state.relay.forward(payload).await?;

    Ok(Json(json!({ "success": true })))
}
