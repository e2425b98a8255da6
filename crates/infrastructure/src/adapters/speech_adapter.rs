//! Speech adapter - Implements TranscriberPort and SynthesizerPort using ai_speech

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ai_speech::{
    DashScopeSpeechProvider, SpeechConfig, SpeechError, SpeechToText, SynthesizedSpeech,
    TextToSpeech,
};
use application::error::ApplicationError;
use application::ports::{SynthesizerPort, TranscriberPort};
use async_trait::async_trait;
use domain::{ExchangeStage, SynthesizedAudioRef};
use secrecy::SecretString;
use tracing::{debug, info, instrument};

use crate::config::SynthesisAppConfig;

/// Adapter for speech services using ai_speech crate
///
/// Inline synthesis results are written to a single fallback file that the
/// HTTP layer serves; concurrent fallbacks overwrite each other.
pub struct SpeechAdapter {
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    voice: Option<String>,
    fallback_file: PathBuf,
    fallback_public_path: String,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("stt_model", &self.stt.model_name())
            .field("voice", &self.voice.as_deref().unwrap_or(self.tts.default_voice()))
            .field("fallback_file", &self.fallback_file)
            .field("fallback_public_path", &self.fallback_public_path)
            .finish()
    }
}

impl SpeechAdapter {
    /// Create a new speech adapter backed by DashScope
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to initialize.
    pub fn new(
        config: SpeechConfig,
        api_key: SecretString,
        synthesis: &SynthesisAppConfig,
    ) -> Result<Self, ApplicationError> {
        let provider = Arc::new(
            DashScopeSpeechProvider::new(config, api_key)
                .map_err(|e| ApplicationError::Configuration(e.to_string()))?,
        );

        Ok(Self::with_providers(provider.clone(), provider, synthesis))
    }

    /// Create an adapter over arbitrary STT/TTS implementations
    pub fn with_providers(
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
        synthesis: &SynthesisAppConfig,
    ) -> Self {
        Self {
            stt,
            tts,
            voice: synthesis.voice.clone(),
            fallback_file: synthesis.fallback_file.clone(),
            fallback_public_path: synthesis.fallback_public_path.clone(),
        }
    }

    /// Map recognition errors to the application taxonomy
    fn map_recognition_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::ServiceError { status, body } => ApplicationError::RecognitionFailed {
                status: Some(status),
                message: body,
            },
            SpeechError::InvalidResponse(message) => ApplicationError::ResponseParseError {
                stage: ExchangeStage::Transcription,
                message,
            },
            SpeechError::InvalidInput(msg) => {
                ApplicationError::Internal(format!("recognition request rejected locally: {msg}"))
            },
            SpeechError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::RecognitionFailed {
                status: None,
                message: other.to_string(),
            },
        }
    }

    /// Map synthesis errors to the application taxonomy
    fn map_synthesis_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::ServiceError { status, body } => ApplicationError::SynthesisFailed {
                status: Some(status),
                message: body,
            },
            SpeechError::InvalidResponse(message) => ApplicationError::ResponseParseError {
                stage: ExchangeStage::Synthesis,
                message,
            },
            SpeechError::EmptySynthesis(msg) => ApplicationError::SynthesisEmptyResult(msg),
            SpeechError::Decode(msg) => ApplicationError::SynthesisDecodeError(msg),
            SpeechError::InvalidInput(msg) => {
                ApplicationError::Internal(format!("synthesis request rejected locally: {msg}"))
            },
            SpeechError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::SynthesisFailed {
                status: None,
                message: other.to_string(),
            },
        }
    }

    /// Write decoded audio to the fallback file
    async fn write_fallback(&self, data: &[u8]) -> Result<SynthesizedAudioRef, ApplicationError> {
        let write_failed = |path: &Path, e: std::io::Error| {
            ApplicationError::SynthesisDecodeError(format!(
                "could not write fallback audio to {}: {e}",
                path.display()
            ))
        };

        if let Some(parent) = self.fallback_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_failed(parent, e))?;
        }
        tokio::fs::write(&self.fallback_file, data)
            .await
            .map_err(|e| write_failed(&self.fallback_file, e))?;

        info!(
            path = %self.fallback_file.display(),
            bytes = data.len(),
            "Wrote inline synthesis result to fallback file"
        );

        Ok(SynthesizedAudioRef::Local {
            file_path: self.fallback_file.clone(),
            public_path: self.fallback_public_path.clone(),
        })
    }
}

#[async_trait]
impl TranscriberPort for SpeechAdapter {
    #[instrument(skip(self))]
    async fn transcribe(&self, audio_url: &str) -> Result<String, ApplicationError> {
        let transcription = self
            .stt
            .transcribe_url(audio_url)
            .await
            .map_err(Self::map_recognition_error)?;

        debug!(
            language = ?transcription.language,
            emotion = ?transcription.emotion,
            "Speech recognized"
        );

        Ok(transcription.text)
    }
}

#[async_trait]
impl SynthesizerPort for SpeechAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudioRef, ApplicationError> {
        let speech = self
            .tts
            .synthesize(text, self.voice.as_deref())
            .await
            .map_err(Self::map_synthesis_error)?;

        match speech {
            SynthesizedSpeech::Url(url) => Ok(SynthesizedAudioRef::Remote { url }),
            SynthesizedSpeech::Inline(data) => self.write_fallback(&data).await,
        }
    }
}
