//! Provider abstraction for the generative backend

pub mod llm;
pub mod openai;

pub use llm::{ChatCompletion, ChatMessage, ChatRequest, LlmProvider};
pub use openai::OpenAiClient;
