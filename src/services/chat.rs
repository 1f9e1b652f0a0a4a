//! Chat service: forwards a conversation to the document-search LLM.
//!
//! DESIGN
//! ======
//! Receives the caller's turns (loading placeholders already excluded),
//! prepends the fixed system instruction, and returns the normalized
//! `{content, citations}` answer. Nothing is retried. Errors keep enough
//! detail for the route layer to pick a status and a user-facing message.

use tracing::{info, warn};

use conversations::{ChatReply, ChatTurn};

use crate::llm::prompt::SYSTEM_INSTRUCTION;
use crate::llm::types::LlmError;
use crate::state::AppState;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("XAI_API_KEY environment variable is not set")]
    LlmNotConfigured,
    #[error("xAI API error: {status} - {body}")]
    Upstream { status: u16, body: String },
    #[error("{0}")]
    Llm(LlmError),
}

impl From<LlmError> for ChatError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ApiResponse { status, body } => Self::Upstream { status, body },
            LlmError::MissingApiKey { .. } => Self::LlmNotConfigured,
            other => Self::Llm(other),
        }
    }
}

impl ChatError {
    /// Grepable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LlmNotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::Upstream { .. } => "E_UPSTREAM",
            Self::Llm(e) => e.error_code(),
        }
    }
}

// =============================================================================
// HANDLER
// =============================================================================

/// Ask the document-search LLM about `turns`.
///
/// # Errors
///
/// Returns [`ChatError::LlmNotConfigured`] without calling out when no
/// client is configured, [`ChatError::Upstream`] on a non-success upstream
/// status, and [`ChatError::Llm`] for transport or parse failures.
pub async fn handle_chat(state: &AppState, turns: &[ChatTurn]) -> Result<ChatReply, ChatError> {
    let Some(llm) = state.llm.as_ref() else {
        warn!("chat: LLM not configured");
        return Err(ChatError::LlmNotConfigured);
    };

    info!(turns = turns.len(), "chat: request received");
    let reply = llm.chat(SYSTEM_INSTRUCTION, turns).await?;
    info!(citations = reply.citations.len(), content_len = reply.content.len(), "chat: reply ready");
    Ok(reply)
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
