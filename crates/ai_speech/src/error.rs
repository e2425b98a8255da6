//! Speech processing errors

use thiserror::Error;

/// Errors that can occur during speech processing
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Caller passed nothing to work on
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Service answered with a non-success status
    #[error("Service error (HTTP {status}): {body}")]
    ServiceError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Invalid response from service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Synthesis succeeded but carried neither a URL nor inline audio
    #[error("Synthesis returned no audio: {0}")]
    EmptySynthesis(String),

    /// Inline audio could not be decoded
    #[error("Audio decode failed: {0}")]
    Decode(String),

    /// Timeout during processing
    #[error("Speech processing timeout after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SpeechError {
    /// Classify a transport error, reporting timeouts with the configured budget
    pub fn from_transport(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }

    /// HTTP status reported by the service, if the failure carried one
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServiceError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
