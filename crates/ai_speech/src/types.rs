//! Speech result types

use serde::{Deserialize, Serialize};

/// Result of speech recognition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    /// Recognized text, trimmed
    pub text: String,
    /// Detected language, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Detected emotion, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
}

impl Transcription {
    /// Create a transcription, trimming surrounding whitespace
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            language: None,
            emotion: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Audio produced by a synthesis call
///
/// The service either hosts the audio and hands back a URL, or embeds the
/// bytes in the response. `Inline` holds the already decoded bytes.
#[derive(Clone, PartialEq, Eq)]
pub enum SynthesizedSpeech {
    Url(String),
    Inline(Vec<u8>),
}

impl std::fmt::Debug for SynthesizedSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Self::Inline(data) => write!(f, "Inline({} bytes)", data.len()),
        }
    }
}
