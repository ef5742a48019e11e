//! HTTP client for the research service
//!
//! Mirrors what a downstream backend does: validate locally, forward the
//! query as `{query, max_number}`, and read back the response contract.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{QueryRequest, QueryResponse};

/// Payload of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `healthy` while the process serves
    pub status: String,
    /// Unix seconds
    pub timestamp: i64,
    /// Whether a generative backend was configured at startup
    pub generative_available: bool,
    /// Service version
    pub version: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Typed client for a running research service
pub struct ResearchClient {
    client: Client,
    base_url: String,
}

impl ResearchClient {
    /// Create a client with a generous timeout (enforced latency can reach 6 minutes)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(420))
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Submit a research query
    pub async fn research(
        &self,
        query: impl Into<String>,
        max_number: i64,
    ) -> Result<QueryResponse> {
        let request = QueryRequest::new(query, max_number);
        request.validate()?;

        let url = format!("{}/research", self.base_url);
        tracing::debug!("Calling research API: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::backend(format!("Research request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("HTTP {}", status),
            };
            return Err(Error::Validation(message));
        }
        if !status.is_success() {
            return Err(Error::backend(format!("Research failed: HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::backend(format!("Failed to parse research response: {}", e)))
    }

    /// Fetch `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Error::backend(format!(
                "Health check failed: HTTP {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
