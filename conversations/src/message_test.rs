use super::*;

// =============================================================================
// derive_title
// =============================================================================

#[test]
fn derive_title_collapses_whitespace() {
    assert_eq!(derive_title("   what   documents   exist  "), "what documents exist");
}

#[test]
fn derive_title_collapses_newlines_and_tabs() {
    assert_eq!(derive_title("who\n\tflew\r\n  where"), "who flew where");
}

#[test]
fn derive_title_truncates_long_input() {
    let input = "a".repeat(60);
    let title = derive_title(&input);
    assert_eq!(title, format!("{}…", "a".repeat(48)));
    assert_eq!(title.chars().count(), 49);
}

#[test]
fn derive_title_keeps_exactly_48_chars() {
    let input = "b".repeat(48);
    assert_eq!(derive_title(&input), input);
}

#[test]
fn derive_title_counts_chars_not_bytes() {
    let input = "é".repeat(50);
    let title = derive_title(&input);
    assert_eq!(title.chars().count(), 49);
    assert!(title.ends_with('…'));
}

#[test]
fn derive_title_blank_falls_back_to_default() {
    assert_eq!(derive_title(" \n\t "), DEFAULT_TITLE);
}

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_parse_accepts_known_roles_only() {
    assert_eq!(Role::parse("user"), Some(Role::User));
    assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
    assert_eq!(Role::parse("system"), None);
    assert_eq!(Role::parse("User"), None);
}

#[test]
fn role_serializes_lowercase() {
    let turn = ChatTurn { role: Role::Assistant, content: "hi".into() };
    let json = serde_json::to_value(&turn).unwrap();
    assert_eq!(json, serde_json::json!({ "role": "assistant", "content": "hi" }));
}

#[test]
fn chat_reply_citations_default_to_empty() {
    let reply: ChatReply = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
    assert!(reply.citations.is_empty());
}

// =============================================================================
// Message / Conversation
// =============================================================================

#[test]
fn user_and_placeholder_have_distinct_ids() {
    let ts = now();
    let user = Message::user("hello", ts);
    let placeholder = Message::placeholder(ts);
    assert_ne!(user.id, placeholder.id);
    assert_eq!(user.timestamp, placeholder.timestamp);
    assert!(placeholder.is_loading);
    assert!(placeholder.content.is_empty());
    assert_eq!(placeholder.role, Role::Assistant);
}

#[test]
fn failure_embeds_description() {
    let msg = Message::failure("p1".into(), "boom", now());
    assert_eq!(msg.id, "p1");
    assert!(msg.is_error);
    assert!(msg.content.contains("boom"));
}

#[test]
fn conversation_turns_skip_placeholders() {
    let ts = now();
    let mut conversation = Conversation::empty();
    conversation.messages.push(Message::user("q", ts));
    conversation.messages.push(Message::placeholder(ts));
    let turns = conversation.turns();
    assert_eq!(turns, vec![ChatTurn { role: Role::User, content: "q".into() }]);
}

#[test]
fn has_user_messages_ignores_assistant_only() {
    let mut conversation = Conversation::empty();
    assert!(!conversation.has_user_messages());
    conversation
        .messages
        .push(Message::answer("a".into(), ChatReply { content: "x".into(), citations: vec![] }, now()));
    assert!(!conversation.has_user_messages());
    conversation.messages.push(Message::user("q", now()));
    assert!(conversation.has_user_messages());
}

#[test]
fn empty_conversation_uses_default_title() {
    let conversation = Conversation::empty();
    assert_eq!(conversation.title, DEFAULT_TITLE);
    assert!(conversation.messages.is_empty());
    assert_eq!(conversation.created_at, conversation.updated_at);
}
