//! HTTP presentation layer
//!
//! Axum router for the voice companion: one multipart chat endpoint that
//! drives the relay pipeline, plus liveness, health, metrics and the route
//! serving the locally persisted synthesis fallback.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
pub use state::{AppState, FallbackAudio};
