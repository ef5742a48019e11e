//! Core types for the research service

pub mod query;
pub mod response;

pub use query::{QueryRequest, Tier};
pub use response::{QueryResponse, ResponseDraft, ResponseMetadata, StrategyKind};
