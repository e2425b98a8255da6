//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{SynthesizedSpeech, Transcription};

/// Port for Speech-to-Text (STT) implementations
///
/// The audio is not uploaded with the call; implementations fetch it from
/// a URL the service can reach.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Recognize the speech in the audio behind `audio_url`
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the service rejects the request or the
    /// response does not carry recognized text.
    async fn transcribe_url(&self, audio_url: &str) -> Result<Transcription, SpeechError>;

    /// Get the name of the current STT model
    fn model_name(&self) -> &str;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech
    ///
    /// # Arguments
    ///
    /// * `text` - Text to synthesize
    /// * `voice` - Optional voice ID to use (uses default if None)
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails or yields no audio.
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SynthesizedSpeech, SpeechError>;

    /// Get the default voice
    fn default_voice(&self) -> &str;
}
