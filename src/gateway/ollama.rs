//! Ollama adapter for chat completions.
//!
//! Talks to a local Ollama server's `/api/chat` endpoint with streaming
//! disabled. No authentication; base URL and timeout come from the
//! environment or explicit configuration.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::types::{ChatRequest, ChatResponse, Message, Role};
use super::ChatGateway;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Maximum allowed response content length (1MB). Evaluation responses are a
/// small JSON object; anything near this limit is garbage.
const MAX_RESPONSE_LEN: usize = 1_024 * 1_024;

/// Ollama API adapter.
#[derive(Debug, Clone)]
pub struct OllamaAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaAdapter {
    /// Create against the default local server.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create from environment variables (`OLLAMA_BASE_URL`,
    /// `OLLAMA_TIMEOUT_SECONDS`).
    pub fn from_env() -> Result<Self, ProviderError> {
        let base_url =
            std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let timeout = std::env::var("OLLAMA_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self::with_config(base_url, timeout)
    }

    /// Create with custom configuration.
    pub fn with_config(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let base_url = base_url.into();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| ProviderError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

// =============================================================================
// API TYPES
// =============================================================================

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    stream: bool,
    options: ApiOptions,
}

#[derive(Serialize)]
struct ApiOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

impl From<&Message> for ApiMessage {
    fn from(m: &Message) -> Self {
        Self {
            role: match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: m.content.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChatApiResponse {
    #[serde(default)]
    model: String,
    message: ApiResponseMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

// =============================================================================
// GATEWAY IMPL
// =============================================================================

#[async_trait]
impl ChatGateway for OllamaAdapter {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = ChatApiRequest {
            model: &req.model,
            messages: req.messages.iter().map(ApiMessage::from).collect(),
            stream: false,
            options: ApiOptions {
                temperature: req.temperature,
            },
        };

        let started = Instant::now();
        let response = self.client.post(self.chat_url()).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let latency = started.elapsed();

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error)
                .unwrap_or_else(|_| text.clone());
            // A 404 from /api/chat means the model is not pulled.
            if status.as_u16() == 404 {
                return Err(ProviderError::model_not_found(&req.model));
            }
            let retryable = status.is_server_error();
            return Err(ProviderError::provider_with_status(
                "ollama",
                message,
                retryable,
                status.as_u16(),
            ));
        }

        if text.len() > MAX_RESPONSE_LEN {
            return Err(ProviderError::provider(
                "ollama",
                format!("response too large: {} bytes", text.len()),
                false,
            ));
        }

        let parsed: ChatApiResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::provider("ollama", format!("malformed response body: {e}"), false)
        })?;

        Ok(ChatResponse {
            content: parsed.message.content,
            model: if parsed.model.is_empty() {
                req.model
            } else {
                parsed.model
            },
            input_tokens: parsed.prompt_eval_count,
            output_tokens: parsed.eval_count,
            latency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_normalizes_trailing_slash() {
        let a = OllamaAdapter::with_config("http://localhost:11434/", Duration::from_secs(5))
            .unwrap();
        assert_eq!(a.chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn api_request_shape() {
        let req = ChatApiRequest {
            model: "gemma3:4b",
            messages: vec![ApiMessage {
                role: "user",
                content: "hi".into(),
            }],
            stream: false,
            options: ApiOptions { temperature: 0.5 },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.5);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
