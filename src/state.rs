//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The proxy is stateless between requests, so it only carries the
//! optional LLM client.

use std::sync::Arc;

use crate::llm::types::LlmChat;

// =============================================================================
// APP STATE
// =============================================================================

/// Clone is required by Axum; the client is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` when `XAI_API_KEY` is not configured;
    /// chat requests then fail with a configuration error.
    pub llm: Option<Arc<dyn LlmChat>>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>) -> Self {
        Self { llm }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
