use super::*;
use crate::message::{ChatReply, now};
use serde_json::json;

fn sample_conversation() -> Conversation {
    let ts = now();
    let mut conversation = Conversation::empty();
    conversation.title = "flight logs".into();
    conversation.messages.push(Message::user("who flew?", ts));
    conversation.messages.push(Message::answer(
        "a-1".into(),
        ChatReply { content: "Several people.".into(), citations: vec!["A.txt".into(), "B.pdf".into()] },
        ts,
    ));
    conversation
        .messages
        .push(Message::failure("a-2".into(), "upstream down", ts));
    conversation
}

// =============================================================================
// encode
// =============================================================================

#[test]
fn encode_uses_camel_case_and_iso_timestamps() {
    let conversation = sample_conversation();
    let raw = encode_conversations(std::slice::from_ref(&conversation)).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    let stored = &value[0];
    assert_eq!(stored["id"], conversation.id.as_str());
    assert!(stored["createdAt"].as_str().unwrap().ends_with('Z'));
    assert!(stored["updatedAt"].is_string());
    assert_eq!(stored["messages"][0]["role"], "user");
    assert!(stored["messages"][0].get("citations").is_none());
    assert!(stored["messages"][0].get("isError").is_none());
    assert_eq!(stored["messages"][1]["citations"], json!(["A.txt", "B.pdf"]));
    assert_eq!(stored["messages"][2]["isError"], true);
}

#[test]
fn encode_skips_loading_placeholders() {
    let mut conversation = sample_conversation();
    conversation.messages.push(Message::placeholder(now()));
    let raw = encode_conversations(&[conversation]).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["messages"].as_array().unwrap().len(), 3);
    assert!(!raw.contains("isLoading"));
}

#[test]
fn format_timestamp_has_millisecond_precision() {
    let ts = DateTime::parse_from_rfc3339("2024-03-05T10:20:30.123Z")
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(format_timestamp(&ts), "2024-03-05T10:20:30.123Z");
}

// =============================================================================
// round trip
// =============================================================================

#[test]
fn round_trip_reconstructs_conversations() {
    let first = sample_conversation();
    let second = Conversation::empty();
    let original = vec![first, second];
    let raw = encode_conversations(&original).unwrap();
    let restored = decode_conversations(&raw).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn sub_millisecond_timestamps_are_stable_across_round_trips() {
    let raw = json!([{
        "id": "c1",
        "title": "precise",
        "createdAt": "2024-01-01T00:00:00.123456Z",
        "updatedAt": "2024-01-01T00:00:00.987654321Z",
        "messages": [
            { "id": "m1", "role": "user", "content": "q", "timestamp": "2024-01-01T00:00:00.000999Z" }
        ]
    }])
    .to_string();

    let first = decode_conversations(&raw).unwrap();
    assert_eq!(format_timestamp(&first[0].created_at), "2024-01-01T00:00:00.123Z");
    assert_eq!(format_timestamp(&first[0].updated_at), "2024-01-01T00:00:00.987Z");

    let second = decode_conversations(&encode_conversations(&first).unwrap()).unwrap();
    assert_eq!(second, first);
}

#[test]
fn round_trip_drops_placeholders_only() {
    let mut with_placeholder = sample_conversation();
    let expected = with_placeholder.clone();
    with_placeholder.messages.push(Message::placeholder(now()));
    let raw = encode_conversations(&[with_placeholder]).unwrap();
    let restored = decode_conversations(&raw).unwrap();
    assert_eq!(restored, vec![expected]);
}

// =============================================================================
// decode: whole payload
// =============================================================================

#[test]
fn decode_rejects_invalid_json() {
    assert!(matches!(decode_conversations("{not json"), Err(CodecError::Json(_))));
}

#[test]
fn decode_rejects_non_list() {
    assert!(matches!(decode_conversations(r#"{"id":"x"}"#), Err(CodecError::NotAList)));
}

#[test]
fn decode_keeps_valid_and_drops_invalid_conversation() {
    let raw = json!([
        {
            "id": "good",
            "title": "ok",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z",
            "messages": []
        },
        { "id": "bad", "createdAt": "not a date", "updatedAt": "2024-01-02T00:00:00.000Z" }
    ])
    .to_string();
    let restored = decode_conversations(&raw).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].id, "good");
}

#[test]
fn decode_all_invalid_yields_empty_list() {
    let raw = json!([1, "two", null, { "title": "no id" }]).to_string();
    assert!(decode_conversations(&raw).unwrap().is_empty());
}

// =============================================================================
// decode: per-field validation
// =============================================================================

#[test]
fn conversation_blank_title_defaults() {
    let raw = json!({
        "id": "c1",
        "title": "   ",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    });
    let conversation = conversation_from_value(&raw).unwrap();
    assert_eq!(conversation.title, DEFAULT_TITLE);
    assert!(conversation.messages.is_empty());
}

#[test]
fn conversation_requires_string_id() {
    let raw = json!({
        "id": 7,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    });
    assert!(conversation_from_value(&raw).is_none());
}

#[test]
fn conversation_drops_invalid_messages_individually() {
    let raw = json!({
        "id": "c1",
        "title": "t",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z",
        "messages": [
            { "id": "m1", "role": "user", "content": "hi", "timestamp": "2024-01-01T00:00:00.000Z" },
            { "id": "m2", "role": "system", "content": "nope", "timestamp": "2024-01-01T00:00:00.000Z" },
            { "id": "m3", "role": "assistant", "content": 5, "timestamp": "2024-01-01T00:00:00.000Z" },
            { "id": "m4", "role": "assistant", "content": "x", "timestamp": "garbage" },
            { "role": "assistant", "content": "x", "timestamp": "2024-01-01T00:00:00.000Z" },
            "not an object"
        ]
    });
    let conversation = conversation_from_value(&raw).unwrap();
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.messages[0].id, "m1");
}

#[test]
fn message_citations_filtered_to_strings() {
    let raw = json!({
        "id": "m1",
        "role": "assistant",
        "content": "answer",
        "timestamp": "2024-01-01T00:00:00.000Z",
        "citations": ["A.txt", 3, null, "B.txt"]
    });
    let message = message_from_value(&raw).unwrap();
    assert_eq!(message.citations, Some(vec!["A.txt".to_owned(), "B.txt".to_owned()]));
}

#[test]
fn message_non_array_citations_become_none() {
    let raw = json!({
        "id": "m1",
        "role": "assistant",
        "content": "answer",
        "timestamp": "2024-01-01T00:00:00.000Z",
        "citations": "A.txt"
    });
    assert_eq!(message_from_value(&raw).unwrap().citations, None);
}

#[test]
fn message_is_error_uses_truthiness_and_loading_is_never_restored() {
    let raw = json!({
        "id": "m1",
        "role": "assistant",
        "content": "",
        "timestamp": "2024-01-01T00:00:00.000Z",
        "isError": 1,
        "isLoading": true
    });
    let message = message_from_value(&raw).unwrap();
    assert!(message.is_error);
    assert!(!message.is_loading);
}

#[test]
fn message_accepts_offset_timestamps() {
    let raw = json!({
        "id": "m1",
        "role": "user",
        "content": "hi",
        "timestamp": "2024-01-01T02:00:00+02:00"
    });
    let message = message_from_value(&raw).unwrap();
    assert_eq!(format_timestamp(&message.timestamp), "2024-01-01T00:00:00.000Z");
}
