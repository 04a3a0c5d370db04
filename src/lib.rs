//! # Slang Search
//!
//! Backend for a Gen Z slang dictionary. Definitions live in one Postgres
//! table keyed by term; unknown terms are resolved through the Gemini API
//! and cached on acceptance so each definition is paid for at most once.
//!
//!
//!
//! # Resolution Flow
//! - Client searches a term
//! - Known term: bump its count and return the stored meaning
//! - Unknown term: ask Gemini with a fixed prompt capped at ~50 words
//! - Gemini hedges or answers "Slang not found!": report not found, store nothing
//! - Otherwise: store the reply with count 1 and return it
//!
//! Counts double as a trending ranking, served by `GET /api/slang`.
//!
//!
//!
//! # Setup
//!
//! Environment (a local `.env` is picked up):
//! - `PORT` (default 5000)
//! - `DATABASE_URL` (default postgresql://localhost:5432/slang)
//! - `GEMINI_API_KEY` (required, `/run/secrets` first, env fallback)
//! - `GEMINI_MODEL` (default gemini-1.5-flash)
//! - `GEMINI_TIMEOUT_SECS` (default 30)
//! - `EMAILJS_ACCESS_TOKEN` (optional, enables report delivery)
//!
//! Run with logs:
//! ```sh
//! RUST_LOG=info cargo run
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod email;
pub mod error;
pub mod gemini;
pub mod resolver;
pub mod routes;
pub mod state;

use routes::{search_handler, send_email_handler, trending_handler, upsert_handler};
use state::AppState;

pub async fn start_server() {
    dotenvy::dotenv().ok();

    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/slang", get(trending_handler))
        .route("/api/slang", post(upsert_handler))
        .route("/api/slang/search", get(search_handler))
        .route("/api/send-email", post(send_email_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
