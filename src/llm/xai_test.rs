use conversations::Role;
use serde_json::json;

use super::*;
use crate::llm::config::{DEFAULT_COLLECTION_ID, DEFAULT_MODEL};

fn search() -> FileSearch {
    FileSearch { collection_id: "collection_test".into(), max_results: 75 }
}

fn turn(role: Role, content: &str) -> ChatTurn {
    ChatTurn { role, content: content.into() }
}

// =============================================================================
// build_request
// =============================================================================

#[test]
fn request_puts_system_first_then_turns_in_order() {
    let turns = vec![
        turn(Role::User, "who flew?"),
        turn(Role::Assistant, "the logs show..."),
        turn(Role::User, "when?"),
    ];
    let search = search();
    let body = serde_json::to_value(build_request("grok-test", "be precise", &turns, &search)).unwrap();

    assert_eq!(body["model"], "grok-test");
    assert_eq!(
        body["input"],
        json!([
            {"role": "system", "content": "be precise"},
            {"role": "user", "content": "who flew?"},
            {"role": "assistant", "content": "the logs show..."},
            {"role": "user", "content": "when?"}
        ])
    );
}

#[test]
fn request_binds_file_search_tool() {
    let search = search();
    let body = serde_json::to_value(build_request("grok-test", "sys", &[], &search)).unwrap();
    assert_eq!(
        body["tools"],
        json!([{"type": "file_search", "vector_store_ids": ["collection_test"], "max_num_results": 75}])
    );
}

// =============================================================================
// parse_responses_response
// =============================================================================

#[test]
fn parse_extracts_reply() {
    let text = json!({
        "output": [{
            "role": "assistant",
            "content": [{
                "type": "output_text",
                "text": "documented answer",
                "annotations": [{"type": "file_citation", "file_citation": {"file_name": "A.txt"}}]
            }]
        }]
    })
    .to_string();
    let reply = parse_responses_response(&text).unwrap();
    assert_eq!(reply.content, "documented answer");
    assert_eq!(reply.citations, vec!["A.txt"]);
}

#[test]
fn parse_rejects_non_json() {
    let err = parse_responses_response("<html>bad gateway</html>").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

// =============================================================================
// XaiClient::new
// =============================================================================

#[test]
fn client_exposes_model_and_collection() {
    let config = LlmConfig::from_lookup(|key| (key == "XAI_API_KEY").then(|| "k".to_string())).unwrap();
    let client = XaiClient::new(&config).unwrap();
    assert_eq!(client.model(), DEFAULT_MODEL);
    assert_eq!(client.collection_id(), DEFAULT_COLLECTION_ID);
}
