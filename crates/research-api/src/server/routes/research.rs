//! Research endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /research - Answer a research query
pub async fn research_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let response = state.handler().handle(request).await?;
    Ok(Json(response))
}

/// GET / - Static service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Mock Research API is running",
        "endpoints": ["/research", "/health", "/test"]
    }))
}

/// GET /health - Reports whether the generative backend is configured
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "generative_available": state.handler().generative_enabled(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /test - Zero-latency fallback sample
pub async fn self_test(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "测试接口正常",
        "sample_response": state.handler().self_test(),
        "note": "这是一个快速测试，实际/research接口会报告2-6分钟的模拟延迟",
    }))
}
