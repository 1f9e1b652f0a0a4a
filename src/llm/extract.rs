//! Normalizes the shapes an upstream answer can take into a `ChatReply`.
//!
//! DESIGN
//! ======
//! Each known shape is a pure extractor `&Value -> Option<String>`. They are
//! tried in priority order and the first `Some` wins, so the Responses
//! `output[]` forms always beat the legacy flat and `choices[]` forms.
//! Citations come only from the assistant message that supplied the answer.

use serde_json::Value;
use tracing::debug;

use conversations::ChatReply;

/// Content returned when no extractor produced any text.
pub const NO_RESPONSE: &str = "No response generated";

type Extractor = fn(&Value) -> Option<String>;

const CONTENT_SHAPES: [(&str, Extractor); 4] = [
    ("output_string", output_string_content),
    ("output_blocks", output_block_content),
    ("legacy_content", legacy_flat_content),
    ("legacy_choices", legacy_choices_content),
];

#[must_use]
pub fn extract_reply(root: &Value) -> ChatReply {
    let content = extract_content(root)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| NO_RESPONSE.to_string());
    ChatReply { content, citations: extract_citations(root) }
}

/// Text of the first shape that matches, if any.
#[must_use]
pub fn extract_content(root: &Value) -> Option<String> {
    CONTENT_SHAPES.iter().find_map(|(shape, extract)| {
        let content = extract(root)?;
        debug!(shape = *shape, "xai: content extracted");
        Some(content)
    })
}

/// Last item of `output[]` whose role is `assistant`.
fn last_assistant_message(root: &Value) -> Option<&Value> {
    root.get("output")?
        .as_array()?
        .iter()
        .rev()
        .find(|item| item.get("role").and_then(Value::as_str) == Some("assistant"))
}

fn output_string_content(root: &Value) -> Option<String> {
    last_assistant_message(root)?
        .get("content")?
        .as_str()
        .map(str::to_owned)
}

fn output_block_content(root: &Value) -> Option<String> {
    let blocks = last_assistant_message(root)?.get("content")?.as_array()?;
    let parts: Vec<&str> = blocks.iter().filter_map(block_text).collect();
    Some(parts.join("\n"))
}

fn block_text(block: &Value) -> Option<&str> {
    if let Some(text) = block.as_str() {
        return Some(text).filter(|t| !t.is_empty());
    }
    match block.get("type").and_then(Value::as_str) {
        Some("text" | "output_text") => block
            .get("text")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty()),
        _ => None,
    }
}

fn legacy_flat_content(root: &Value) -> Option<String> {
    root.get("content")?
        .as_str()
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
}

fn legacy_choices_content(root: &Value) -> Option<String> {
    root.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_owned)
}

// =============================================================================
// CITATIONS
// =============================================================================

/// File names cited by the answering assistant message, first-seen order,
/// without duplicates.
#[must_use]
pub fn extract_citations(root: &Value) -> Vec<String> {
    let Some(message) = last_assistant_message(root) else {
        return Vec::new();
    };

    let block_annotations = message
        .get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|block| block.get("annotations").and_then(Value::as_array))
        .flatten();
    let message_annotations = message
        .get("annotations")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();

    let mut citations: Vec<String> = Vec::new();
    for name in message_annotations
        .chain(block_annotations)
        .filter_map(citation_name)
    {
        if !citations.iter().any(|seen| seen == name) {
            citations.push(name.to_owned());
        }
    }
    citations
}

/// `file_citation` annotations name a file either through a nested
/// `file_citation` object or flat on the annotation itself.
fn citation_name(annotation: &Value) -> Option<&str> {
    if annotation.get("type").and_then(Value::as_str) != Some("file_citation") {
        return None;
    }
    let source = annotation.get("file_citation").unwrap_or(annotation);
    ["file_name", "filename", "file_id"]
        .iter()
        .find_map(|key| source.get(*key).and_then(Value::as_str).filter(|v| !v.is_empty()))
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
