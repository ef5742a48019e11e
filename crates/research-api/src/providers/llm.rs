//! LLM provider trait for chat-completion style generation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System instruction message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Provider-independent completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Conversation, system message first
    pub messages: Vec<ChatMessage>,
    /// Output token cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// Completion text with the provider's reported usage
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    /// Text of the first choice
    pub content: String,
    /// Reported usage, 0 when the backend omits it
    pub total_tokens: u64,
}

/// Trait for chat-completion backends
///
/// Implementations:
/// - `OpenAiClient`: any OpenAI-compatible `/chat/completions` endpoint
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one completion; every failure is an `Error::Backend`
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
