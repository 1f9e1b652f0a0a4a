//! Seam between the conversation store and whatever reaches the proxy.

use crate::message::{ChatReply, ChatTurn};

/// Fallback description when the proxy fails without an `error` body.
pub const GENERIC_FAILURE: &str = "Failed to get response";

/// Why a send did not produce a reply. `Display` is the user-facing text
/// embedded into the error message that replaces the placeholder.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The proxy answered with a non-success status.
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Status { status: u16, message: Option<String> },

    /// The request never completed (connection refused, timeout, ...).
    #[error("{0}")]
    Request(String),

    /// The proxy answered 200 but the body was not a `ChatReply`.
    #[error("{0}")]
    Decode(String),
}

/// Sends the turn list for one pending answer.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no reply could be obtained.
    async fn send(&self, turns: &[ChatTurn]) -> Result<ChatReply, TransportError>;
}
