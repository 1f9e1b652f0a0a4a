//! Plain-text rendering of conversations for the terminal.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use conversations::{Conversation, Message, Role, format_relative_time};

/// One line per conversation, most recent first, active one starred.
#[must_use]
pub fn conversation_list(conversations: &[Conversation], active_id: Option<&str>, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for (index, conversation) in conversations.iter().enumerate() {
        let marker = if Some(conversation.id.as_str()) == active_id { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:>2}. {}  ({}, {} messages)",
            index + 1,
            conversation.title,
            format_relative_time(conversation.updated_at, now),
            conversation.messages.len(),
        );
    }
    out
}

/// A single message with its speaker prefix and any sources.
#[must_use]
pub fn message(message: &Message) -> String {
    let speaker = match (message.role, message.is_error) {
        (Role::User, _) => "you",
        (Role::Assistant, false) => "docchat",
        (Role::Assistant, true) => "error",
    };
    let body = if message.is_loading { "…" } else { message.content.as_str() };

    let mut out = format!("{speaker}> {body}\n");
    if let Some(citations) = message.citations.as_deref().filter(|c| !c.is_empty()) {
        out.push_str("Sources:\n");
        for citation in citations {
            let _ = writeln!(out, "  - {citation}");
        }
    }
    out
}

/// Title header followed by every message.
#[must_use]
pub fn transcript(conversation: &Conversation) -> String {
    let mut out = format!("== {} ==\n", conversation.title);
    for m in &conversation.messages {
        out.push_str(&message(m));
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
