//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the chat proxy endpoint and a health probe under a single Axum
//! router. When a static directory is configured, the browser frontend is
//! served from it as the fallback for every other path.

pub mod chat;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes: `POST /api/chat` and `GET /healthz`.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application router. `static_dir`, when set, serves the frontend.
pub fn app(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = api_routes(state);
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
