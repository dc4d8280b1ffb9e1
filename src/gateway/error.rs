//! Error types for the model-chat gateway.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested model is not present on the server (pull it first).
    #[error("model not found: {model}")]
    ModelNotFound { model: String },

    /// Provider error - may be retryable by an outer caller.
    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
        retryable: bool,
        http_status: Option<u16>,
    },

    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// HTTP/network error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (bad base URL, unusable client settings).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Create a provider error.
    pub fn provider(provider: &'static str, message: impl Into<String>, retryable: bool) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            retryable,
            http_status: None,
        }
    }

    /// Create a provider error carrying the HTTP status.
    pub fn provider_with_status(
        provider: &'static str,
        message: impl Into<String>,
        retryable: bool,
        status: u16,
    ) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            retryable,
            http_status: Some(status),
        }
    }

    /// Create a model-not-found error.
    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model: model.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether an outer caller could retry this error. The evaluation
    /// orchestrator itself never retries: any failure falls back to the
    /// heuristic engine for that turn.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ModelNotFound { .. } => false,
            Self::Provider { retryable, .. } => *retryable,
            Self::Timeout(_) => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Config(_) => false,
        }
    }

    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModelNotFound { .. } => "model_not_found",
            Self::Provider { .. } => "provider_error",
            Self::Timeout(_) => "timeout",
            Self::Http(_) => "http_error",
            Self::Config(_) => "config_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_by_variant() {
        assert!(!ProviderError::model_not_found("gemma3:4b").is_retryable());
        assert!(!ProviderError::config("bad url").is_retryable());
        assert!(ProviderError::Timeout(Duration::from_secs(5)).is_retryable());
        assert!(ProviderError::provider("ollama", "overloaded", true).is_retryable());
        assert!(!ProviderError::provider("ollama", "bad request", false).is_retryable());
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ProviderError::model_not_found("m").code(), "model_not_found");
        assert_eq!(
            ProviderError::provider_with_status("ollama", "oops", true, 500).code(),
            "provider_error"
        );
    }
}
