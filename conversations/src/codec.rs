//! Persisted form of the conversation list.
//!
//! DESIGN
//! ======
//! Encoding goes through borrowed serde structs with camelCase keys and
//! RFC 3339 millisecond timestamps. Decoding walks `serde_json::Value`
//! field by field instead of deriving `Deserialize`, so one bad entry is
//! dropped without failing the rest. Stored state written by older or
//! newer builds is accepted as long as the required fields parse.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::message::{Conversation, DEFAULT_TITLE, Message, Role};

/// Error returned by [`decode_conversations`] when the payload as a whole is unusable.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("stored conversations are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored conversations are not a list")]
    NotAList,
}

// =============================================================================
// ENCODE
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredConversation<'a> {
    id: &'a str,
    title: &'a str,
    created_at: String,
    updated_at: String,
    messages: Vec<StoredMessage<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredMessage<'a> {
    id: &'a str,
    role: Role,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    citations: Option<&'a [String]>,
    timestamp: String,
    #[serde(skip_serializing_if = "is_false")]
    is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Format a timestamp the way it is stored (`2024-01-02T03:04:05.678Z`).
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parsed timestamps are cut to milliseconds, the precision they are stored at.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc).trunc_subsecs(3))
}

fn to_stored(conversation: &Conversation) -> StoredConversation<'_> {
    StoredConversation {
        id: &conversation.id,
        title: &conversation.title,
        created_at: format_timestamp(&conversation.created_at),
        updated_at: format_timestamp(&conversation.updated_at),
        messages: conversation
            .messages
            .iter()
            .filter(|m| !m.is_loading)
            .map(|m| StoredMessage {
                id: &m.id,
                role: m.role,
                content: &m.content,
                citations: m.citations.as_deref(),
                timestamp: format_timestamp(&m.timestamp),
                is_error: m.is_error,
            })
            .collect(),
    }
}

/// Serialize the full list. Loading placeholders are left out.
///
/// # Errors
///
/// Returns an error only if `serde_json` fails to serialize, which does not
/// happen for these types in practice.
pub fn encode_conversations(conversations: &[Conversation]) -> Result<String, serde_json::Error> {
    let stored: Vec<StoredConversation<'_>> = conversations.iter().map(to_stored).collect();
    serde_json::to_string(&stored)
}

// =============================================================================
// DECODE
// =============================================================================

/// Parse a stored payload into the conversations that pass validation.
///
/// # Errors
///
/// Returns [`CodecError`] when the payload is not JSON or not a list. An
/// empty result means every entry was rejected.
pub fn decode_conversations(raw: &str) -> Result<Vec<Conversation>, CodecError> {
    let root: Value = serde_json::from_str(raw)?;
    let Some(items) = root.as_array() else {
        return Err(CodecError::NotAList);
    };
    Ok(items.iter().filter_map(conversation_from_value).collect())
}

/// Validate one stored conversation. Returns `None` when a required field is
/// missing or malformed. Invalid messages are dropped individually.
#[must_use]
pub fn conversation_from_value(raw: &Value) -> Option<Conversation> {
    let obj = raw.as_object()?;
    let id = non_empty_str(obj.get("id"))?;
    let created_at = obj
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;
    let updated_at = obj
        .get("updatedAt")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;

    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_owned();

    let messages = obj
        .get("messages")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(message_from_value).collect())
        .unwrap_or_default();

    Some(Conversation { id, title, messages, created_at, updated_at })
}

/// Validate one stored message.
#[must_use]
pub fn message_from_value(raw: &Value) -> Option<Message> {
    let obj = raw.as_object()?;
    let id = non_empty_str(obj.get("id"))?;
    let role = obj
        .get("role")
        .and_then(Value::as_str)
        .and_then(Role::parse)?;
    let content = obj.get("content").and_then(Value::as_str)?.to_owned();
    let timestamp = obj
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;

    let citations = obj
        .get("citations")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        });

    let is_error = obj.get("isError").is_some_and(is_truthy);

    Some(Message { id, role, content, citations, timestamp, is_error, is_loading: false })
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod tests;
