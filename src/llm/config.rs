//! LLM configuration parsed from environment variables.

use super::types::LlmError;

pub const API_KEY_VAR: &str = "XAI_API_KEY";
pub const DEFAULT_XAI_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_MODEL: &str = "grok-4-1-fast-reasoning";
pub const DEFAULT_COLLECTION_ID: &str = "collection_8b792b21-5c87-47c6-901b-0395a6589e33";
pub const DEFAULT_MAX_SEARCH_RESULTS: u32 = 75;
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// The document collection searched on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSearch {
    pub collection_id: String,
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub search: FileSearch,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Required:
    /// - `XAI_API_KEY`
    ///
    /// Optional:
    /// - `XAI_BASE_URL`: default `https://api.x.ai/v1`
    /// - `XAI_MODEL`: default `grok-4-1-fast-reasoning`
    /// - `XAI_COLLECTION_ID`: the searched document collection
    /// - `XAI_MAX_SEARCH_RESULTS`: default 75
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 300
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when the key is absent or blank.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reading through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when the key is absent or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey { var: API_KEY_VAR.into() })?;

        let base_url = lookup("XAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_XAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = non_blank(lookup("XAI_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let search = FileSearch {
            collection_id: non_blank(lookup("XAI_COLLECTION_ID")).unwrap_or_else(|| DEFAULT_COLLECTION_ID.to_string()),
            max_results: parse_or(lookup("XAI_MAX_SEARCH_RESULTS"), DEFAULT_MAX_SEARCH_RESULTS),
        };
        let timeouts = LlmTimeouts {
            request_secs: parse_or(lookup("LLM_REQUEST_TIMEOUT_SECS"), DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(lookup("LLM_CONNECT_TIMEOUT_SECS"), DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, base_url, model, search, timeouts })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
