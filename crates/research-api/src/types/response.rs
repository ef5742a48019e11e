//! Response types for research queries

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::query::Tier;
use crate::error::{Error, Result};
use crate::generation::render;

/// Which strategy fulfilled a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Live generative backend
    Generative,
    /// Deterministic template synthesis
    Fallback,
}

impl StrategyKind {
    /// Wire name, as reported in `strategy_used`
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Generative => "generative",
            StrategyKind::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response metadata with fixed keys plus strategy-specific extras
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Requested tier
    pub tier: Tier,
    /// Declared processing latency for the tier
    pub simulated_latency_seconds: u64,
    /// Strategy that produced the response
    pub strategy_used: StrategyKind,
    /// Unix timestamp (seconds) of construction
    pub timestamp: i64,
    /// Confidence score (0.0-1.0)
    pub confidence_score: f64,
    /// Number of fragments, always `fragments.len()`
    pub fragment_count: usize,
    /// Strategy-specific keys (e.g. `model_used`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Inputs for a response, before rendering and derivation
#[derive(Debug, Clone)]
pub struct ResponseDraft {
    /// Plain answer prose; rendered into `result`
    pub raw_result: String,
    /// Supporting fragments in order
    pub fragments: Vec<String>,
    /// Token accounting signal
    pub tokens_consumed: u64,
    /// Requested tier
    pub tier: Tier,
    /// Latency drawn for the tier
    pub simulated_latency_seconds: u64,
    /// Strategy producing the draft
    pub strategy: StrategyKind,
    /// Clamped to 0.0-1.0 on assembly
    pub confidence_score: f64,
    /// Extra metadata keys
    pub extra: Map<String, Value>,
}

/// Answer to a research query, identical in shape for every strategy
///
/// Wire field names (`result`, `consume_token`, `chunk`) are the ones
/// existing consumers deserialize. Deserializing checks the same
/// invariants as `assemble`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WireResponse")]
pub struct QueryResponse {
    #[serde(rename = "result")]
    rendered_result: String,
    raw_result: String,
    #[serde(rename = "consume_token")]
    tokens_consumed: u64,
    metadata: ResponseMetadata,
    #[serde(rename = "chunk")]
    fragments: Vec<String>,
}

impl QueryResponse {
    /// Build a response from a draft
    ///
    /// Renders `raw_result`, derives `fragment_count` and stamps the current
    /// time. Fails when the raw text is blank or any fragment is blank.
    pub fn assemble(draft: ResponseDraft) -> Result<Self> {
        if draft.raw_result.trim().is_empty() {
            return Err(Error::backend("empty answer text"));
        }
        if draft.fragments.is_empty() {
            return Err(Error::backend("no supporting fragments"));
        }
        if draft.fragments.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::backend("blank supporting fragment"));
        }
        Ok(Self::from_trusted(draft))
    }

    /// Build a response from a draft whose text is known to be non-blank
    pub(crate) fn from_trusted(draft: ResponseDraft) -> Self {
        debug_assert!(!draft.raw_result.trim().is_empty());
        debug_assert!(!draft.fragments.is_empty());

        let metadata = ResponseMetadata {
            tier: draft.tier,
            simulated_latency_seconds: draft.simulated_latency_seconds,
            strategy_used: draft.strategy,
            timestamp: chrono::Utc::now().timestamp(),
            confidence_score: draft.confidence_score.clamp(0.0, 1.0),
            fragment_count: draft.fragments.len(),
            extra: draft.extra,
        };

        Self {
            rendered_result: render(&draft.raw_result),
            raw_result: draft.raw_result,
            tokens_consumed: draft.tokens_consumed,
            metadata,
            fragments: draft.fragments,
        }
    }

    /// HTML-rendered answer
    pub fn rendered_result(&self) -> &str {
        &self.rendered_result
    }

    /// Plain answer text
    pub fn raw_result(&self) -> &str {
        &self.raw_result
    }

    /// Token accounting signal (not billing-accurate)
    pub fn tokens_consumed(&self) -> u64 {
        self.tokens_consumed
    }

    /// Response metadata
    pub fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    /// Supporting fragments in order
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Strategy that produced this response
    pub fn strategy(&self) -> StrategyKind {
        self.metadata.strategy_used
    }
}

/// Unchecked wire form of `QueryResponse`
#[derive(Deserialize)]
struct WireResponse {
    result: String,
    raw_result: String,
    consume_token: u64,
    metadata: ResponseMetadata,
    chunk: Vec<String>,
}

impl TryFrom<WireResponse> for QueryResponse {
    type Error = Error;

    fn try_from(wire: WireResponse) -> Result<Self> {
        if wire.result.trim().is_empty() {
            return Err(Error::backend("empty rendered result"));
        }
        if wire.raw_result.trim().is_empty() {
            return Err(Error::backend("empty answer text"));
        }
        if wire.chunk.is_empty() || wire.chunk.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::backend("missing or blank supporting fragment"));
        }
        if wire.metadata.fragment_count != wire.chunk.len() {
            return Err(Error::backend(format!(
                "fragment_count {} does not match {} fragments",
                wire.metadata.fragment_count,
                wire.chunk.len()
            )));
        }

        Ok(Self {
            rendered_result: wire.result,
            raw_result: wire.raw_result,
            tokens_consumed: wire.consume_token,
            metadata: wire.metadata,
            fragments: wire.chunk,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ResponseDraft {
        ResponseDraft {
            raw_result: "First paragraph.\n\nSecond paragraph.".to_string(),
            fragments: vec!["one".to_string(), "two".to_string()],
            tokens_consumed: 42,
            tier: Tier::Six,
            simulated_latency_seconds: 200,
            strategy: StrategyKind::Generative,
            confidence_score: 0.9,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_assemble_derives_fields() {
        let response = QueryResponse::assemble(draft()).unwrap();
        assert_eq!(response.metadata().fragment_count, 2);
        assert_eq!(response.rendered_result(), render(response.raw_result()));
        assert_eq!(response.strategy(), StrategyKind::Generative);
        assert!(response.metadata().timestamp > 0);
    }

    #[test]
    fn test_assemble_rejects_blank_content() {
        let mut d = draft();
        d.raw_result = "  \n ".to_string();
        assert!(QueryResponse::assemble(d).is_err());

        let mut d = draft();
        d.fragments.clear();
        assert!(QueryResponse::assemble(d).is_err());

        let mut d = draft();
        d.fragments.push(" ".to_string());
        assert!(QueryResponse::assemble(d).is_err());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let mut d = draft();
        d.confidence_score = 1.7;
        let response = QueryResponse::assemble(d).unwrap();
        assert_eq!(response.metadata().confidence_score, 1.0);
    }

    #[test]
    fn test_wire_shape() {
        let mut d = draft();
        d.extra.insert("model_used".to_string(), Value::from("gpt-4o-mini"));
        let value = serde_json::to_value(QueryResponse::assemble(d).unwrap()).unwrap();

        assert!(value["result"].as_str().unwrap().contains("<p>First paragraph.</p>"));
        assert_eq!(value["consume_token"], 42);
        assert_eq!(value["chunk"].as_array().unwrap().len(), 2);

        let metadata = &value["metadata"];
        assert_eq!(metadata["tier"], 6);
        assert_eq!(metadata["simulated_latency_seconds"], 200);
        assert_eq!(metadata["strategy_used"], "generative");
        assert_eq!(metadata["fragment_count"], 2);
        assert_eq!(metadata["model_used"], "gpt-4o-mini");
    }

    #[test]
    fn test_deserialize_keeps_extras() {
        let mut d = draft();
        d.extra.insert("model_used".to_string(), Value::from("fallback-mock"));
        let json = serde_json::to_string(&QueryResponse::assemble(d).unwrap()).unwrap();

        let parsed: QueryResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.metadata().extra["model_used"], "fallback-mock");
        assert_eq!(parsed.fragments().len(), 2);
    }

    #[test]
    fn test_deserialize_rejects_broken_contract() {
        let valid = serde_json::to_value(QueryResponse::assemble(draft()).unwrap()).unwrap();

        let mut wrong_count = valid.clone();
        wrong_count["metadata"]["fragment_count"] = Value::from(5);
        assert!(serde_json::from_value::<QueryResponse>(wrong_count).is_err());

        let mut blank_text = valid.clone();
        blank_text["raw_result"] = Value::from("   ");
        assert!(serde_json::from_value::<QueryResponse>(blank_text).is_err());

        let mut blank_fragment = valid.clone();
        blank_fragment["chunk"] = serde_json::json!(["one", " "]);
        assert!(serde_json::from_value::<QueryResponse>(blank_fragment).is_err());

        assert!(serde_json::from_value::<QueryResponse>(valid).is_ok());
    }
}
