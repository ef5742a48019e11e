//! Application state for the research server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::ResearchConfig;
use crate::error::Result;
use crate::handler::RequestHandler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ResearchConfig,
    /// Request handler (strategies, randomness, latency mode)
    handler: RequestHandler,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state from configuration
    pub fn new(config: ResearchConfig) -> Result<Self> {
        tracing::info!("Initializing research application state...");
        let handler = RequestHandler::from_config(&config)?;
        Ok(Self::with_handler(config, handler))
    }

    /// Create state around an existing handler
    pub fn with_handler(config: ResearchConfig, handler: RequestHandler) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                handler,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &ResearchConfig {
        &self.inner.config
    }

    /// Get request handler
    pub fn handler(&self) -> &RequestHandler {
        &self.inner.handler
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
