//! Live generative strategy backed by an `LlmProvider`

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::ResponseStrategy;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::{split_blocks, PromptBuilder};
use crate::providers::{ChatRequest, LlmProvider};
use crate::random::RandomSource;
use crate::types::{QueryResponse, ResponseDraft, StrategyKind, Tier};

/// Output caps and temperatures for the two calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerativeSettings {
    /// Output cap for the main answer
    pub answer_max_tokens: u32,
    /// Temperature for the main answer
    pub answer_temperature: f32,
    /// Output cap for the fragments call
    pub fragment_max_tokens: u32,
    /// Temperature for the fragments call
    pub fragment_temperature: f32,
}

impl Default for GenerativeSettings {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

impl From<&LlmConfig> for GenerativeSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            answer_max_tokens: config.answer_max_tokens,
            answer_temperature: config.answer_temperature,
            fragment_max_tokens: config.fragment_max_tokens,
            fragment_temperature: config.fragment_temperature,
        }
    }
}

/// Answers with two concurrent completions: main prose and fragments
pub struct GenerativeStrategy {
    llm: Arc<dyn LlmProvider>,
    rng: Arc<dyn RandomSource>,
    settings: GenerativeSettings,
}

impl GenerativeStrategy {
    /// Create a strategy over `llm`; `rng` draws the confidence score
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        rng: Arc<dyn RandomSource>,
        settings: GenerativeSettings,
    ) -> Self {
        Self { llm, rng, settings }
    }

    /// Generate a response; any failure of either call fails the whole strategy
    pub async fn generate(
        &self,
        query: &str,
        tier: Tier,
        simulated_latency_seconds: u64,
    ) -> Result<QueryResponse> {
        let answer_request = ChatRequest {
            messages: PromptBuilder::answer_messages(query),
            max_tokens: self.settings.answer_max_tokens,
            temperature: self.settings.answer_temperature,
        };
        let fragment_request = ChatRequest {
            messages: PromptBuilder::fragment_messages(query),
            max_tokens: self.settings.fragment_max_tokens,
            temperature: self.settings.fragment_temperature,
        };

        tracing::info!(
            "Generating answer with {} ({})",
            self.llm.name(),
            self.llm.model()
        );

        let (answer, fragment_text) = tokio::try_join!(
            self.llm.complete(answer_request),
            self.llm.complete(fragment_request),
        )?;

        if answer.content.trim().is_empty() {
            return Err(Error::backend("backend returned an empty answer"));
        }

        let fragments = split_blocks(&fragment_text.content);
        if fragments.is_empty() {
            return Err(Error::backend("backend returned no fragments"));
        }

        let mut extra = Map::new();
        extra.insert("model_used".to_string(), Value::from(self.llm.model()));

        QueryResponse::assemble(ResponseDraft {
            raw_result: answer.content.trim().to_string(),
            fragments,
            tokens_consumed: answer.total_tokens + fragment_text.total_tokens,
            tier,
            simulated_latency_seconds,
            strategy: StrategyKind::Generative,
            confidence_score: self.rng.float_in(0.7..=0.95),
            extra,
        })
    }
}

#[async_trait]
impl ResponseStrategy for GenerativeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Generative
    }

    async fn fulfill(
        &self,
        query: &str,
        tier: Tier,
        simulated_latency_seconds: u64,
    ) -> Result<QueryResponse> {
        self.generate(query, tier, simulated_latency_seconds).await
    }
}
