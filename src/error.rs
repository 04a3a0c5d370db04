use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{database::StoreError, resolver::ProviderError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Term is required")]
    MissingTerm,

    #[error("Database error")]
    Store(#[from] StoreError),

    #[error("Failed to fetch definition from Gemini")]
    Provider(#[from] ProviderError),

    #[error("Failed to send email")]
    EmailRelay(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingTerm => StatusCode::BAD_REQUEST,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Provider { .. } => StatusCode::BAD_GATEWAY,
            AppError::EmailRelay { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {self:?}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
