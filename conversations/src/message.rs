//! Conversation and message model plus the proxy wire types.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title used until the first user message arrives.
pub const DEFAULT_TITLE: &str = "New chat";

/// Maximum title length in characters before truncation.
const TITLE_MAX_CHARS: usize = 48;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Speaker of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse a stored role. Anything but `user` / `assistant` is rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// One prior turn as sent to the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// `POST /api/chat` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

/// `POST /api/chat` success body: answer text plus deduplicated citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

// =============================================================================
// MESSAGE
// =============================================================================

/// A single message in a conversation.
///
/// `is_loading` marks the transient placeholder shown while a send is in
/// flight. Placeholders are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub citations: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
    pub is_error: bool,
    pub is_loading: bool,
}

impl Message {
    /// A user message with a fresh id.
    #[must_use]
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            role: Role::User,
            content: content.into(),
            citations: None,
            timestamp,
            is_error: false,
            is_loading: false,
        }
    }

    /// An empty assistant placeholder with a fresh id.
    #[must_use]
    pub fn placeholder(timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            role: Role::Assistant,
            content: String::new(),
            citations: None,
            timestamp,
            is_error: false,
            is_loading: true,
        }
    }

    /// The finished assistant answer that takes over a placeholder's id.
    #[must_use]
    pub fn answer(id: String, reply: ChatReply, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: reply.content,
            citations: Some(reply.citations),
            timestamp,
            is_error: false,
            is_loading: false,
        }
    }

    /// An error-flagged assistant message that takes over a placeholder's id.
    #[must_use]
    pub fn failure(id: String, description: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: format!("Sorry, I encountered an error: {description}"),
            citations: None,
            timestamp,
            is_error: true,
            is_loading: false,
        }
    }

    /// Strip to the `{role, content}` form the proxy expects.
    #[must_use]
    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn { role: self.role, content: self.content.clone() }
    }
}

// =============================================================================
// CONVERSATION
// =============================================================================

/// An ordered list of messages with a title and recency stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// A fresh conversation with the default title and no messages.
    #[must_use]
    pub fn empty() -> Self {
        let now = now();
        Self { id: new_id(), title: DEFAULT_TITLE.to_owned(), messages: Vec::new(), created_at: now, updated_at: now }
    }

    /// True when a non-placeholder user message already exists.
    #[must_use]
    pub fn has_user_messages(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.role == Role::User && !m.is_loading)
    }

    /// Turns for the proxy: every non-placeholder message, in order.
    #[must_use]
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .filter(|m| !m.is_loading)
            .map(Message::to_turn)
            .collect()
    }
}

/// Derive a sidebar title from the first user message.
///
/// Whitespace runs collapse to a single space and the result is trimmed.
/// Titles longer than 48 characters are cut and suffixed with `…`.
#[must_use]
pub fn derive_title(first_user_message: &str) -> String {
    let one_line = first_user_message
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if one_line.is_empty() {
        return DEFAULT_TITLE.to_owned();
    }
    if one_line.chars().count() > TITLE_MAX_CHARS {
        let mut title: String = one_line.chars().take(TITLE_MAX_CHARS).collect();
        title.push('…');
        title
    } else {
        one_line
    }
}

/// Current time at millisecond precision, matching the persisted form.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
