//! HTTP routes

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::services::ServeFile;

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let fallback = state.fallback_audio.clone();
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::health::liveness))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
        .route(
            "/chat",
            post(handlers::chat::chat).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route_service(&fallback.route_path(), ServeFile::new(&fallback.file_path))
        .layer(RequestIdLayer::new())
        .with_state(state)
}
