//! Audio payloads entering and leaving the pipeline

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Format of uploaded audio
///
/// Only WAV is accepted at ingress; the recognition service is fed a URL to
/// the stored object, so the bytes are never transcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// RIFF/WAVE, typically 16-bit PCM
    Wav,
}

impl AudioFormat {
    /// Content types accepted for upload; the two are equivalent aliases
    pub const ACCEPTED_MIME_TYPES: [&'static str; 2] = ["audio/wav", "audio/x-wav"];

    /// Get the canonical MIME type for this format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
        }
    }

    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
        }
    }

    /// Parse from MIME type, ignoring parameters and case
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let base = mime.split(';').next().unwrap_or(mime).trim();
        Self::ACCEPTED_MIME_TYPES
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(base))
            .then_some(Self::Wav)
    }

    /// Validate a declared content type against the allow-list
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self, DomainError> {
        let declared = content_type.unwrap_or_default();
        Self::from_mime_type(declared).ok_or_else(|| {
            DomainError::unsupported_media_type(if declared.is_empty() {
                "<none>"
            } else {
                declared
            })
        })
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Raw uploaded audio plus its validated format
#[derive(Clone, PartialEq, Eq)]
pub struct AudioPayload {
    data: Vec<u8>,
    format: AudioFormat,
}

impl AudioPayload {
    /// Create a payload from fully buffered bytes
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Result<Self, DomainError> {
        if data.is_empty() {
            return Err(DomainError::EmptyPayload);
        }
        Ok(Self { data, format })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Debug for AudioPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioPayload")
            .field("format", &self.format)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

/// Where the synthesized reply audio can be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SynthesizedAudioRef {
    /// Playable URL returned by the synthesis service
    Remote { url: String },
    /// Inline audio persisted locally and served under `public_path`
    Local {
        file_path: PathBuf,
        public_path: String,
    },
}

impl SynthesizedAudioRef {
    /// The reference handed back to the caller
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote { url } => url,
            Self::Local { public_path, .. } => public_path,
        }
    }

    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }
}

impl fmt::Display for SynthesizedAudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
