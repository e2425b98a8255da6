//! API error handling
//!
//! Every failure leaves as `{"detail": ..., "code": ...}`. Bad input is a
//! 400, an oversized upload a 413, and any upstream or integration failure
//! a 500. The detail string of the underlying error is kept as-is.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::ExchangeStage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upload exceeded the configured body limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Failure reported by the voice pipeline
    #[error(transparent)]
    Pipeline(#[from] ApplicationError),
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable description
    pub detail: String,
    /// Stable snake_case error kind
    pub code: String,
}

impl ApiError {
    /// HTTP status this error maps to
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Pipeline(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error kind reported in the `code` field
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Pipeline(err) => err.kind(),
        }
    }

    /// Pipeline stage the failure is attributed to
    pub const fn stage(&self) -> Option<ExchangeStage> {
        match self {
            Self::PayloadTooLarge(_) => Some(ExchangeStage::Ingress),
            Self::Pipeline(err) => err.stage(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
            code: self.code().to_string(),
        };

        if status.is_server_error() {
            tracing::error!(code = %body.code, detail = %body.detail, "Request failed");
        } else {
            tracing::debug!(code = %body.code, detail = %body.detail, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_media_type_is_bad_request() {
        let err = ApiError::from(ApplicationError::UnsupportedMediaType("audio/mpeg".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "unsupported_media_type");
        assert_eq!(err.stage(), Some(ExchangeStage::Ingress));
    }

    #[test]
    fn upstream_failures_are_internal_errors() {
        let errors = [
            ApplicationError::UploadFailed("403".into()),
            ApplicationError::RecognitionFailed {
                status: Some(500),
                message: "boom".into(),
            },
            ApplicationError::SynthesisEmptyResult("{}".into()),
            ApplicationError::Configuration("missing key".into()),
        ];
        for err in errors {
            assert_eq!(
                ApiError::from(err).status_code(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn payload_too_large_maps_to_413() {
        let err = ApiError::PayloadTooLarge("length limit exceeded".into());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.code(), "payload_too_large");
    }

    #[test]
    fn detail_preserves_pipeline_message() {
        let err = ApiError::from(ApplicationError::GenerationFailed {
            status: Some(429),
            message: "throttled".into(),
        });
        assert_eq!(err.to_string(), "Generation failed (HTTP 429): throttled");
    }

    #[test]
    fn into_response_sets_status() {
        let response = ApiError::from(ApplicationError::InvalidInput("no audio".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
