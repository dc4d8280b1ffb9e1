//! Core types for the model-chat gateway.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request for a chat completion.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier, e.g. "gemma3:4b".
    pub model: String,
    /// Messages in order.
    pub messages: Vec<Message>,
    /// Sampling temperature.
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.0,
        }
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }
}

/// Response from a chat completion.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated content.
    pub content: String,
    /// Model that actually served the request.
    pub model: String,
    /// Prompt tokens consumed, if the provider reported them.
    pub input_tokens: Option<u32>,
    /// Generated tokens, if reported.
    pub output_tokens: Option<u32>,
    /// Wall-clock time for the request.
    pub latency: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_defaults() {
        let req = ChatRequest::new("gemma3:4b", vec![Message::user("hi")]);
        assert_eq!(req.model, "gemma3:4b");
        assert_eq!(req.temperature, 0.0);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = Message::assistant("ok");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }
}
