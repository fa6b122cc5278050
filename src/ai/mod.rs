//! Chat-completion integration
//!
//! Builds prompt payloads from validated input and sends them to an
//! OpenAI-compatible chat-completion endpoint.

pub mod mock;
pub mod openai;
pub mod request;
pub mod types;

pub use mock::MockCompletionClient;
pub use openai::OpenAiCompletionClient;
pub use types::ChatRequest;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the first choice's text; any failure is [`crate::Error::Completion`].
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
