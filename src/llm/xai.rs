//! xAI Responses API client with the `file_search` tool bound to one
//! document collection.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use conversations::{ChatReply, ChatTurn};

use super::config::{FileSearch, LlmConfig};
use super::extract;
use super::types::LlmError;

pub struct XaiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    search: FileSearch,
}

impl XaiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            search: config.search.clone(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn collection_id(&self) -> &str {
        &self.search.collection_id
    }

    /// Send `system` plus `turns` with file search enabled and normalize
    /// the answer.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ApiResponse`] on a non-success status,
    /// [`LlmError::ApiRequest`] on transport failure, and
    /// [`LlmError::ApiParse`] when the body is not JSON.
    pub async fn respond(&self, system: &str, turns: &[ChatTurn]) -> Result<ChatReply, LlmError> {
        let body = build_request(&self.model, system, turns, &self.search);
        let text = self.send_json("/responses", &body).await?;
        debug!(payload = %text, "xai: raw response");
        parse_responses_response(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            error!(status = status.as_u16(), body = %text, "xai: upstream error");
            return Err(LlmError::ApiResponse { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// RESPONSES: wire types
// =============================================================================

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    input: Vec<RespInputMessage<'a>>,
    tools: [FileSearchTool<'a>; 1],
}

#[derive(Serialize)]
struct RespInputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct FileSearchTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    vector_store_ids: [&'a str; 1],
    max_num_results: u32,
}

fn build_request<'a>(model: &'a str, system: &'a str, turns: &'a [ChatTurn], search: &'a FileSearch) -> RespRequest<'a> {
    let mut input = Vec::with_capacity(turns.len() + 1);
    input.push(RespInputMessage { role: "system", content: system });
    input.extend(
        turns
            .iter()
            .map(|turn| RespInputMessage { role: turn.role.as_str(), content: &turn.content }),
    );
    RespRequest {
        model,
        input,
        tools: [FileSearchTool {
            tool_type: "file_search",
            vector_store_ids: [search.collection_id.as_str()],
            max_num_results: search.max_results,
        }],
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_responses_response(json_text: &str) -> Result<ChatReply, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    Ok(extract::extract_reply(&root))
}

#[cfg(test)]
#[path = "xai_test.rs"]
mod tests;
