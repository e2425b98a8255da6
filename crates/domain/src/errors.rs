//! Domain-level errors

use thiserror::Error;

use crate::entities::ExchangeStatus;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Declared media type is outside the WAV allow-list
    #[error("Unsupported media type: {0} (only WAV audio is accepted)")]
    UnsupportedMediaType(String),

    /// Uploaded audio contained no bytes
    #[error("Audio payload is empty")]
    EmptyPayload,

    /// Exchange state machine was driven out of order
    #[error("Invalid exchange transition from {from} to {to}")]
    InvalidTransition {
        from: ExchangeStatus,
        to: ExchangeStatus,
    },
}

impl DomainError {
    /// Create an unsupported media type error
    pub fn unsupported_media_type(content_type: impl Into<String>) -> Self {
        Self::UnsupportedMediaType(content_type.into())
    }
}
