mod llm;
mod routes;
mod services;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::llm::types::LlmChat;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");
    let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);

    // A missing key is non-fatal: every chat request then fails with a config error.
    let llm: Option<Arc<dyn LlmChat>> = match llm::LlmClient::from_env_optional().expect("LLM client init failed") {
        Some(client) => {
            tracing::info!(model = client.model(), collection = client.collection_id(), "LLM client initialized");
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("XAI_API_KEY not set; chat requests will fail");
            None
        }
    };

    let state = state::AppState::new(llm);
    let app = routes::app(state, static_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "docchat listening");
    axum::serve(listener, app).await.expect("server failed");
}
