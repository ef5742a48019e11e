//! Deterministic fallback responses

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::ResponseStrategy;
use crate::error::Result;
use crate::random::RandomSource;
use crate::types::{QueryResponse, ResponseDraft, StrategyKind, Tier};

/// Model name reported by fallback responses
pub const FALLBACK_MODEL: &str = "fallback-mock";
/// Fixed confidence for fallback responses
pub const FALLBACK_CONFIDENCE: f64 = 0.8;

/// Synthesizes a full response from the query text alone
pub struct FallbackGenerator {
    rng: Arc<dyn RandomSource>,
}

impl FallbackGenerator {
    /// Create a generator drawing token counts from `rng`
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }

    /// Build the fallback response
    pub fn generate(
        &self,
        query: &str,
        tier: Tier,
        simulated_latency_seconds: u64,
    ) -> QueryResponse {
        let mut extra = Map::new();
        extra.insert("model_used".to_string(), Value::from(FALLBACK_MODEL));

        let draft = ResponseDraft {
            raw_result: Self::answer_text(query, tier),
            fragments: Self::fragments(query),
            tokens_consumed: self.rng.int_in(800..=1500),
            tier,
            simulated_latency_seconds,
            strategy: StrategyKind::Fallback,
            confidence_score: FALLBACK_CONFIDENCE,
            extra,
        };

        // Templates always carry text, even for an empty query.
        QueryResponse::from_trusted(draft)
    }

    fn answer_text(query: &str, tier: Tier) -> String {
        format!(
            "根据您的查询\"{query}\"，这是一个模拟的研究结果。\n\
             \n\
             在深度为{tier}的分析中，我们发现以下关键信息：\n\
             \n\
             1. 相关概念和定义\n\
             2. 主要影响因素\n\
             3. 当前发展趋势\n\
             4. 实际应用案例\n\
             \n\
             这个回答是基于广泛的资料分析和专业判断得出的。",
            query = query,
            tier = tier.as_number()
        )
    }

    fn fragments(query: &str) -> Vec<String> {
        vec![
            format!("文档片段1：关于{}的基础概念介绍...", query),
            format!("文档片段2：{}的历史发展和演变过程...", query),
            format!("文档片段3：{}在实际应用中的案例分析...", query),
            format!("文档片段4：{}的未来发展趋势和前景...", query),
        ]
    }
}

#[async_trait]
impl ResponseStrategy for FallbackGenerator {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    async fn fulfill(
        &self,
        query: &str,
        tier: Tier,
        simulated_latency_seconds: u64,
    ) -> Result<QueryResponse> {
        Ok(self.generate(query, tier, simulated_latency_seconds))
    }
}
