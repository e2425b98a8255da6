//! Application-level errors
//!
//! One variant per failure kind of the voice pipeline. The HTTP layer only
//! distinguishes client errors from everything else, but the variants stay
//! distinct so logs and metrics can tell "bad input", "their outage" and
//! "their contract changed" apart.

use domain::{DomainError, ExchangeStage};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Declared media type is not WAV
    #[error("Unsupported audio format: {0}")]
    UnsupportedMediaType(String),

    /// Malformed upload (missing field, empty body, unreadable multipart)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Writing the clip to object storage failed
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Recognition service rejected the request or was unreachable
    #[error("Recognition failed{}: {message}", status_suffix(.status))]
    RecognitionFailed { status: Option<u16>, message: String },

    /// Generation service rejected the request or was unreachable
    #[error("Generation failed{}: {message}", status_suffix(.status))]
    GenerationFailed { status: Option<u16>, message: String },

    /// Synthesis service rejected the request or was unreachable
    #[error("Synthesis failed{}: {message}", status_suffix(.status))]
    SynthesisFailed { status: Option<u16>, message: String },

    /// Synthesis succeeded but carried neither a URL nor inline audio
    #[error("Synthesis returned no audio: {0}")]
    SynthesisEmptyResult(String),

    /// Inline synthesis audio could not be decoded or persisted
    #[error("Synthesis audio could not be decoded: {0}")]
    SynthesisDecodeError(String),

    /// A success response did not have the documented shape
    #[error("Unexpected {stage} response: {message}")]
    ResponseParseError {
        stage: ExchangeStage,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map_or_else(String::new, |s| format!(" (HTTP {s})"))
}

impl ApplicationError {
    /// Pipeline stage this error is attributed to, if any
    pub const fn stage(&self) -> Option<ExchangeStage> {
        match self {
            Self::UnsupportedMediaType(_) | Self::InvalidInput(_) => Some(ExchangeStage::Ingress),
            Self::UploadFailed(_) => Some(ExchangeStage::Upload),
            Self::RecognitionFailed { .. } => Some(ExchangeStage::Transcription),
            Self::GenerationFailed { .. } => Some(ExchangeStage::Generation),
            Self::SynthesisFailed { .. }
            | Self::SynthesisEmptyResult(_)
            | Self::SynthesisDecodeError(_) => Some(ExchangeStage::Synthesis),
            Self::ResponseParseError { stage, .. } => Some(*stage),
            Self::Configuration(_) | Self::Internal(_) => None,
        }
    }

    /// Stable snake_case code for logs, metrics and error bodies
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedMediaType(_) => "unsupported_media_type",
            Self::InvalidInput(_) => "invalid_input",
            Self::UploadFailed(_) => "upload_failed",
            Self::RecognitionFailed { .. } => "recognition_failed",
            Self::GenerationFailed { .. } => "generation_failed",
            Self::SynthesisFailed { .. } => "synthesis_failed",
            Self::SynthesisEmptyResult(_) => "synthesis_empty_result",
            Self::SynthesisDecodeError(_) => "synthesis_decode_error",
            Self::ResponseParseError { .. } => "response_parse_error",
            Self::Configuration(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether the caller sent something we cannot process
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedMediaType(_) | Self::InvalidInput(_))
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnsupportedMediaType(declared) => Self::UnsupportedMediaType(format!(
                "{declared}; only WAV audio (audio/wav, audio/x-wav) is supported"
            )),
            DomainError::EmptyPayload => Self::InvalidInput(err.to_string()),
            DomainError::InvalidTransition { .. } => Self::Internal(err.to_string()),
        }
    }
}
