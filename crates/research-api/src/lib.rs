//! research-api: research query service with generative and fallback strategies
//!
//! Accepts a natural-language query and a complexity tier, and always answers
//! with the same response contract: rendered HTML, raw prose, token accounting,
//! metadata and supporting fragments. When the generative backend is missing
//! or fails, a deterministic fallback answers instead.

pub mod client;
pub mod config;
pub mod error;
pub mod generation;
pub mod handler;
pub mod providers;
pub mod random;
pub mod server;
pub mod strategy;
pub mod types;

pub use client::ResearchClient;
pub use config::ResearchConfig;
pub use error::{Error, Result};
pub use handler::RequestHandler;
pub use types::{
    query::{QueryRequest, Tier},
    response::{QueryResponse, StrategyKind},
};
