//! LLM: document-search adapter over the xAI Responses API.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables (`config`). `LlmClient`
//! owns the xAI client and implements the [`types::LlmChat`] seam the chat
//! service depends on, so handlers never see the provider directly.
//! Answer normalization lives in `extract` as pure functions over JSON.

pub mod config;
pub mod extract;
pub mod prompt;
pub mod types;
pub mod xai;

use conversations::{ChatReply, ChatTurn};

use config::LlmConfig;
use types::{LlmChat, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

pub struct LlmClient {
    inner: xai::XaiClient,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `XAI_API_KEY` is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(&LlmConfig::from_env()?)
    }

    /// Like [`Self::from_env`], but a missing API key yields `Ok(None)` so
    /// the server can start and answer chat requests with a config error.
    ///
    /// # Errors
    ///
    /// Returns every other construction failure, e.g. an HTTP client that
    /// cannot be built.
    pub fn from_env_optional() -> Result<Option<Self>, LlmError> {
        missing_key_as_none(Self::from_env())
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self { inner: xai::XaiClient::new(config)? })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.inner.model()
    }

    #[must_use]
    pub fn collection_id(&self) -> &str {
        self.inner.collection_id()
    }
}

fn missing_key_as_none<T>(result: Result<T, LlmError>) -> Result<Option<T>, LlmError> {
    match result {
        Ok(client) => Ok(Some(client)),
        Err(LlmError::MissingApiKey { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, system: &str, turns: &[ChatTurn]) -> Result<ChatReply, LlmError> {
        self.inner.respond(system, turns).await
    }
}
