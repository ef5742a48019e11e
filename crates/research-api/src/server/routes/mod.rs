//! HTTP routes for the research server

pub mod research;

use axum::{
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build the service routes
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(research::root))
        .route("/health", get(research::health_check))
        .route("/test", get(research::self_test))
        .route("/research", post(research::research_query))
}
