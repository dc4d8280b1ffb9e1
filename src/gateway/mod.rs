//! Model-chat gateway: the external capability consumed by the
//! model-assisted scorer.
//!
//! The orchestrator makes exactly one call per evaluated turn and treats any
//! failure as a fallback trigger, so there is no retry layer here. An
//! application that wants retries or an outer timeout wraps the trait
//! itself.

pub mod error;
pub mod ollama;
pub mod types;

pub use error::ProviderError;
pub use ollama::OllamaAdapter;
pub use types::{ChatRequest, ChatResponse, Message, Role};

#[async_trait::async_trait]
pub trait ChatGateway: Send + Sync {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, ProviderError>;
}
