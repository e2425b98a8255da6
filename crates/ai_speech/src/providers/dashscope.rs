//! DashScope Speech Provider
//!
//! Implements `SpeechToText` with `qwen3-asr-flash` and `TextToSpeech` with
//! `qwen-tts`. Both go through the multimodal generation endpoint.
//!
//! Recognition takes a public audio URL, never raw bytes. Synthesis answers
//! either with a hosted audio URL or with base64 audio embedded in the JSON.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{SynthesizedSpeech, Transcription};

/// DashScope speech provider implementing both STT and TTS
pub struct DashScopeSpeechProvider {
    client: Client,
    config: SpeechConfig,
    api_key: SecretString,
}

impl fmt::Debug for DashScopeSpeechProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashScopeSpeechProvider")
            .field("config", &self.config)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl DashScopeSpeechProvider {
    /// Create a new DashScope speech provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig, api_key: SecretString) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// POST a body to the multimodal endpoint and return the raw success body
    async fn post<T: Serialize + Sync>(&self, body: &T) -> Result<String, SpeechError> {
        let timeout_ms = self.config.timeout_ms;
        let response = self
            .client
            .post(self.config.multimodal_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| SpeechError::from_transport(&e, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "DashScope speech request failed");
            return Err(SpeechError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| SpeechError::from_transport(&e, timeout_ms))
    }
}

// ---------------------------------------------------------------------------
// Recognition wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct AsrRequest<'a> {
    model: &'a str,
    input: AsrInput<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<AsrParameters<'a>>,
}

#[derive(Debug, Serialize)]
struct AsrInput<'a> {
    messages: [AsrMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct AsrMessage<'a> {
    role: &'a str,
    content: [AsrContent<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum AsrContent<'a> {
    Text(&'a str),
    Audio(&'a str),
}

#[derive(Debug, Serialize)]
struct AsrParameters<'a> {
    asr_options: AsrOptions<'a>,
}

#[derive(Debug, Serialize)]
struct AsrOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    enable_itn: bool,
}

#[derive(Debug, Deserialize)]
struct AsrResponse {
    output: Option<AsrOutput>,
}

#[derive(Debug, Deserialize)]
struct AsrOutput {
    #[serde(default)]
    choices: Vec<AsrChoice>,
}

#[derive(Debug, Deserialize)]
struct AsrChoice {
    message: Option<AsrResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct AsrResponseMessage {
    #[serde(default)]
    content: Vec<AsrResponseContent>,
    #[serde(default)]
    annotations: Vec<AsrAnnotation>,
}

#[derive(Debug, Deserialize)]
struct AsrResponseContent {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AsrAnnotation {
    language: Option<String>,
    emotion: Option<String>,
}

// ---------------------------------------------------------------------------
// Synthesis wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: TtsInput<'a>,
}

#[derive(Debug, Serialize)]
struct TtsInput<'a> {
    text: &'a str,
    voice: &'a str,
}

#[derive(Debug, Deserialize)]
struct TtsResponse {
    output: Option<TtsOutput>,
}

#[derive(Debug, Deserialize)]
struct TtsOutput {
    audio: Option<TtsAudio>,
}

#[derive(Debug, Deserialize)]
struct TtsAudio {
    url: Option<String>,
    data: Option<String>,
}

/// Pick the audio out of a synthesis response, URL first
fn extract_speech(body: &str) -> Result<SynthesizedSpeech, SpeechError> {
    let parsed: TtsResponse =
        serde_json::from_str(body).map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

    let audio = parsed
        .output
        .and_then(|output| output.audio)
        .ok_or_else(|| SpeechError::EmptySynthesis("missing output.audio".to_string()))?;

    if let Some(url) = audio.url.filter(|u| !u.trim().is_empty()) {
        return Ok(SynthesizedSpeech::Url(url));
    }

    match audio.data.filter(|d| !d.trim().is_empty()) {
        Some(data) => STANDARD
            .decode(data.trim())
            .map(SynthesizedSpeech::Inline)
            .map_err(|e| SpeechError::Decode(e.to_string())),
        None => Err(SpeechError::EmptySynthesis(
            "output.audio has neither url nor data".to_string(),
        )),
    }
}

#[async_trait]
impl SpeechToText for DashScopeSpeechProvider {
    #[instrument(skip(self), fields(model = %self.config.stt_model))]
    async fn transcribe_url(&self, audio_url: &str) -> Result<Transcription, SpeechError> {
        if audio_url.trim().is_empty() {
            return Err(SpeechError::InvalidInput("audio URL is empty".to_string()));
        }

        let parameters = (self.config.asr_language.is_some() || self.config.enable_itn).then(|| {
            AsrParameters {
                asr_options: AsrOptions {
                    language: self.config.asr_language.as_deref(),
                    enable_itn: self.config.enable_itn,
                },
            }
        });
        let request = AsrRequest {
            model: &self.config.stt_model,
            input: AsrInput {
                messages: [
                    AsrMessage {
                        role: "system",
                        content: [AsrContent::Text(&self.config.system_instruction)],
                    },
                    AsrMessage {
                        role: "user",
                        content: [AsrContent::Audio(audio_url)],
                    },
                ],
            },
            parameters,
        };

        debug!("Requesting speech recognition");
        let body = self.post(&request).await?;

        let parsed: AsrResponse =
            serde_json::from_str(&body).map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;
        let message = parsed
            .output
            .and_then(|output| output.choices.into_iter().next())
            .and_then(|choice| choice.message)
            .ok_or_else(|| {
                SpeechError::InvalidResponse("missing output.choices[0].message".to_string())
            })?;
        let text = message
            .content
            .into_iter()
            .next()
            .and_then(|content| content.text)
            .ok_or_else(|| {
                SpeechError::InvalidResponse(
                    "missing output.choices[0].message.content[0].text".to_string(),
                )
            })?;

        let mut transcription = Transcription::new(text);
        if let Some(annotation) = message.annotations.into_iter().next() {
            if let Some(language) = annotation.language {
                transcription = transcription.with_language(language);
            }
            if let Some(emotion) = annotation.emotion {
                transcription = transcription.with_emotion(emotion);
            }
        }

        debug!(
            text_len = transcription.text.len(),
            language = ?transcription.language,
            "Recognition complete"
        );

        Ok(transcription)
    }

    fn model_name(&self) -> &str {
        &self.config.stt_model
    }
}

#[async_trait]
impl TextToSpeech for DashScopeSpeechProvider {
    #[instrument(skip(self, text), fields(model = %self.config.tts_model, text_len = text.len()))]
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SynthesizedSpeech, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidInput("text is empty".to_string()));
        }

        let voice = voice.unwrap_or(&self.config.default_voice);
        let request = TtsRequest {
            model: &self.config.tts_model,
            input: TtsInput { text, voice },
        };

        debug!(voice, "Requesting speech synthesis");
        let body = self.post(&request).await?;
        let speech = extract_speech(&body)?;

        debug!(speech = ?speech, "Synthesis complete");
        Ok(speech)
    }

    fn default_voice(&self) -> &str {
        &self.config.default_voice
    }
}
