//! Request handling: validation, latency, strategy selection
//!
//! The handler only ever fails on invalid input. Backend failures are
//! logged and answered with the fallback strategy.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{LatencyMode, ResearchConfig};
use crate::error::Result;
use crate::providers::{LlmProvider, OpenAiClient};
use crate::random::{RandomSource, ThreadRandom};
use crate::strategy::{FallbackGenerator, GenerativeSettings, GenerativeStrategy, ResponseStrategy};
use crate::types::{QueryRequest, QueryResponse, StrategyKind, Tier};

/// Query used by the self-test endpoint
pub const SELF_TEST_QUERY: &str = "这是一个测试查询";

/// Turns research requests into responses
///
/// Strategies are tried in order; the chain always ends with the
/// fallback generator, which cannot fail.
pub struct RequestHandler {
    chain: Vec<Arc<dyn ResponseStrategy>>,
    fallback: Arc<FallbackGenerator>,
    rng: Arc<dyn RandomSource>,
    latency_mode: LatencyMode,
}

impl RequestHandler {
    /// Handler with no generative backend
    pub fn fallback_only(rng: Arc<dyn RandomSource>) -> Self {
        let fallback = Arc::new(FallbackGenerator::new(Arc::clone(&rng)));
        Self {
            chain: vec![fallback.clone() as Arc<dyn ResponseStrategy>],
            fallback,
            rng,
            latency_mode: LatencyMode::ReportOnly,
        }
    }

    /// Handler that tries the given strategy before falling back
    pub fn with_strategy(strategy: Arc<dyn ResponseStrategy>, rng: Arc<dyn RandomSource>) -> Self {
        let mut handler = Self::fallback_only(rng);
        handler.chain.insert(0, strategy);
        handler
    }

    /// Handler using `llm` for the generative strategy
    pub fn with_provider(
        llm: Arc<dyn LlmProvider>,
        settings: GenerativeSettings,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        let strategy = GenerativeStrategy::new(llm, Arc::clone(&rng), settings);
        Self::with_strategy(Arc::new(strategy), rng)
    }

    /// Build from configuration; the capability flag is fixed here
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        let rng: Arc<dyn RandomSource> = Arc::new(ThreadRandom);

        let handler = if config.generative_enabled() {
            let client = OpenAiClient::new(&config.llm)?;
            tracing::info!(
                "Generative backend enabled ({} at {})",
                config.llm.model,
                config.llm.base_url
            );
            Self::with_provider(Arc::new(client), GenerativeSettings::from(&config.llm), rng)
        } else {
            tracing::warn!("No backend credential configured, using fallback responses only");
            Self::fallback_only(rng)
        };

        Ok(handler.latency_mode(config.latency.mode))
    }

    /// Set how simulated latency is applied
    pub fn latency_mode(mut self, mode: LatencyMode) -> Self {
        self.latency_mode = mode;
        self
    }

    /// Whether a generative backend was configured at startup
    pub fn generative_enabled(&self) -> bool {
        self.chain
            .iter()
            .any(|strategy| strategy.kind() == StrategyKind::Generative)
    }

    /// Strategies in the order they are tried
    pub fn strategies(&self) -> Vec<StrategyKind> {
        self.chain.iter().map(|strategy| strategy.kind()).collect()
    }

    /// Validate, simulate latency, and fulfill a request
    pub async fn handle(&self, request: QueryRequest) -> Result<QueryResponse> {
        let tier = request.validate()?;
        let query = request.query.as_str();

        let latency = self.simulated_latency(tier);
        tracing::info!(
            "Research query (tier {}, simulated latency {}s): \"{}\"",
            tier,
            latency,
            query
        );

        if self.latency_mode == LatencyMode::Enforce {
            // Dropped with the request future when the client disconnects.
            tokio::time::sleep(Duration::from_secs(latency)).await;
        }

        let response = self.fulfill(query, tier, latency).await;

        tracing::info!(
            "Query answered by {} strategy ({} tokens, {} fragments)",
            response.strategy(),
            response.tokens_consumed(),
            response.fragments().len()
        );

        Ok(response)
    }

    async fn fulfill(&self, query: &str, tier: Tier, latency: u64) -> QueryResponse {
        for strategy in &self.chain {
            match strategy.fulfill(query, tier, latency).await {
                Ok(response) => return response,
                Err(e) => {
                    tracing::warn!("{} strategy failed, trying next: {}", strategy.kind(), e);
                }
            }
        }

        tracing::error!("Every strategy failed, using fallback templates");
        self.fallback.generate(query, tier, latency)
    }

    /// Zero-latency fallback response for a fixed query
    pub fn self_test(&self) -> QueryResponse {
        self.fallback.generate(SELF_TEST_QUERY, Tier::Three, 0)
    }

    fn simulated_latency(&self, tier: Tier) -> u64 {
        let latency = self.rng.int_in(tier.latency_window());
        tracing::debug!("Simulated latency for tier {}: {}s", tier, latency);
        latency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::{ChatCompletion, ChatRequest};
    use crate::random::SeededRandom;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and either echoes or fails
    struct CountingLlm {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLlm {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl LlmProvider for CountingLlm {
        async fn complete(&self, _request: ChatRequest) -> Result<ChatCompletion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::backend("connection refused"));
            }
            Ok(ChatCompletion {
                content: "Generated paragraph one.\n\nGenerated paragraph two.".to_string(),
                total_tokens: 50,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(!self.fail)
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn model(&self) -> &str {
            "counting-model"
        }
    }

    fn rng() -> Arc<dyn RandomSource> {
        Arc::new(SeededRandom::new(99))
    }

    fn handler_with(llm: Arc<CountingLlm>) -> RequestHandler {
        RequestHandler::with_provider(llm, GenerativeSettings::default(), rng())
    }

    #[tokio::test]
    async fn test_invalid_tier_rejected_before_backend() {
        let llm = CountingLlm::new(false);
        let handler = handler_with(llm.clone());

        for bad in [0, 1, 2, 4, 5, 7, 10, -6] {
            let err = handler.handle(QueryRequest::new("valid query", bad)).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_backend() {
        let llm = CountingLlm::new(false);
        let handler = handler_with(llm.clone());

        let err = handler.handle(QueryRequest::new(" \t\n", 3)).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_when_unconfigured() {
        let handler = RequestHandler::fallback_only(rng());
        assert!(!handler.generative_enabled());

        let query = "什么是人工智能?";
        let response = handler.handle(QueryRequest::new(query, 3)).await.unwrap();

        assert_eq!(response.strategy(), StrategyKind::Fallback);
        assert_eq!(response.metadata().fragment_count, 4);
        assert!(response.raw_result().contains(query));
        assert_eq!(response.metadata().confidence_score, 0.8);
        assert!((800..=1500).contains(&response.tokens_consumed()));
    }

    #[tokio::test]
    async fn test_backend_failure_downgrades_to_fallback() {
        let llm = CountingLlm::new(true);
        let handler = handler_with(llm.clone());
        assert!(handler.generative_enabled());

        let response = handler.handle(QueryRequest::new("区块链是什么", 6)).await.unwrap();
        assert_eq!(response.strategy(), StrategyKind::Fallback);
        assert_eq!(response.fragments().len(), 4);
        assert!(llm.calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_generative_success() {
        let llm = CountingLlm::new(false);
        let handler = handler_with(llm.clone());

        let response = handler.handle(QueryRequest::new("What is AI?", 3)).await.unwrap();
        assert_eq!(response.strategy(), StrategyKind::Generative);
        assert_eq!(response.tokens_consumed(), 100);
        assert_eq!(response.fragments().len(), 2);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_latency_window_per_tier() {
        let handler = RequestHandler::fallback_only(Arc::new(ThreadRandom));
        for _ in 0..100 {
            let three = handler.handle(QueryRequest::new("q", 3)).await.unwrap();
            assert!((120..=240).contains(&three.metadata().simulated_latency_seconds));

            let six = handler.handle(QueryRequest::new("q", 6)).await.unwrap();
            assert!((180..=360).contains(&six.metadata().simulated_latency_seconds));
        }
    }

    #[tokio::test]
    async fn test_responses_satisfy_contract() {
        let handlers = [
            RequestHandler::fallback_only(rng()),
            handler_with(CountingLlm::new(false)),
            handler_with(CountingLlm::new(true)),
        ];

        for handler in &handlers {
            for tier in [3, 6] {
                let response = handler.handle(QueryRequest::new("contract", tier)).await.unwrap();
                assert!(!response.raw_result().is_empty());
                assert!(!response.rendered_result().is_empty());
                assert!(!response.fragments().is_empty());
                assert!(response.fragments().iter().all(|f| !f.trim().is_empty()));
                assert_eq!(response.metadata().fragment_count, response.fragments().len());
                assert_eq!(response.metadata().tier.as_number() as i64, tier);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_enforced_latency_waits() {
        let handler = RequestHandler::fallback_only(rng()).latency_mode(LatencyMode::Enforce);
        let start = tokio::time::Instant::now();

        let response = handler.handle(QueryRequest::new("q", 3)).await.unwrap();
        let waited = start.elapsed().as_secs();
        assert_eq!(waited, response.metadata().simulated_latency_seconds);
    }

    #[test]
    fn test_chain_ends_with_fallback() {
        let fallback_only = RequestHandler::fallback_only(rng());
        assert_eq!(fallback_only.strategies(), [StrategyKind::Fallback]);

        let handler = handler_with(CountingLlm::new(false));
        assert_eq!(
            handler.strategies(),
            [StrategyKind::Generative, StrategyKind::Fallback]
        );
    }

    #[test]
    fn test_self_test_is_zero_latency_fallback() {
        let handler = handler_with(CountingLlm::new(false));
        let response = handler.self_test();

        assert_eq!(response.strategy(), StrategyKind::Fallback);
        assert_eq!(response.metadata().simulated_latency_seconds, 0);
        assert!(response.raw_result().contains(SELF_TEST_QUERY));
    }

    #[test]
    fn test_from_config_without_key_is_fallback_only() {
        let handler = RequestHandler::from_config(&ResearchConfig::default()).unwrap();
        assert!(!handler.generative_enabled());
    }
}
