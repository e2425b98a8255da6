//! Health check handlers

use axum::Json;
use serde::{Deserialize, Serialize};

/// Status line returned by `GET /`
pub const LIVENESS_STATUS: &str = "AI 虚拟恋人后端运行中 ❤️";

/// Static liveness payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: LIVENESS_STATUS.to_string(),
    })
}

/// Health check with the running version
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
