//! Answer synthesis via a chat model
//!
//! A trait over chat-completion backends plus an OpenAI-compatible HTTP
//! implementation. The same backend serves the remote OpenAI API and a
//! local Ollama daemon, which differ only in base URL and credentials.

mod http_backend;

pub use http_backend::*;

use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;

/// One chat completion plus its token usage
#[derive(Debug, Clone, Default)]
pub struct ChatOutput {
    pub text: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl ChatOutput {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Trait for chat-completion providers
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one system + user exchange and return the assistant reply
    async fn complete(&self, system: &str, user: &str) -> Result<ChatOutput>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Create a chat model based on settings
pub fn create_chat_model(settings: &Settings) -> Result<Box<dyn ChatModel>> {
    let model = HttpChatModel::new(settings)?;
    Ok(Box::new(model))
}
