//! HTTP side of the CLI: the proxy transport and the health probe.

use serde_json::Value;

use conversations::{ChatReply, ChatRequest, ChatTransport, ChatTurn, TransportError};

/// Sends turns to `{base_url}/api/chat`. No client-side timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self { client, endpoint: endpoint(base_url, "/api/chat") }
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, turns: &[ChatTurn]) -> Result<ChatReply, TransportError> {
        let request = ChatRequest { messages: turns.to_vec() };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Map a non-success proxy response to a transport error, keeping the
/// `{error}` text when the body carries one.
#[must_use]
pub fn status_error(status: u16, body: &str) -> TransportError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .filter(|m| !m.is_empty());
    TransportError::Status { status, message }
}

/// `GET {base_url}/healthz`; returns the status code.
pub async fn ping(client: &reqwest::Client, base_url: &str) -> Result<u16, reqwest::Error> {
    let response = client.get(endpoint(base_url, "/healthz")).send().await?;
    Ok(response.status().as_u16())
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
