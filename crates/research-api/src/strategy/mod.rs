//! Fulfillment strategies sharing one response contract
//!
//! - `GenerativeStrategy`: live chat-completion backend, may fail
//! - `FallbackGenerator`: deterministic templates, never fails

pub mod fallback;
pub mod generative;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{QueryResponse, StrategyKind, Tier};

pub use fallback::FallbackGenerator;
pub use generative::{GenerativeSettings, GenerativeStrategy};

/// A way of turning a validated query into a response
#[async_trait]
pub trait ResponseStrategy: Send + Sync {
    /// Value reported as `strategy_used`
    fn kind(&self) -> StrategyKind;

    /// Produce a complete response for the query
    async fn fulfill(
        &self,
        query: &str,
        tier: Tier,
        simulated_latency_seconds: u64,
    ) -> Result<QueryResponse>;
}
