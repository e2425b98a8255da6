//! Configuration for speech processing

use serde::{Deserialize, Serialize};

/// Configuration for the speech recognition and synthesis services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the DashScope API (up to and including `/api/v1`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Speech recognition model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Speech synthesis model
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Default voice for synthesis
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Text of the system message sent with every recognition request
    #[serde(default)]
    pub system_instruction: String,

    /// Language hint for recognition (e.g. "zh"), auto-detected when unset
    #[serde(default)]
    pub asr_language: Option<String>,

    /// Ask the recognizer for inverse text normalization
    #[serde(default)]
    pub enable_itn: bool,
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1".to_string()
}

fn default_stt_model() -> String {
    "qwen3-asr-flash".to_string()
}

fn default_tts_model() -> String {
    "qwen-tts".to_string()
}

fn default_voice() -> String {
    "Cherry".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            stt_model: default_stt_model(),
            tts_model: default_tts_model(),
            default_voice: default_voice(),
            timeout_ms: default_timeout_ms(),
            system_instruction: String::new(),
            asr_language: None,
            enable_itn: false,
        }
    }
}

impl SpeechConfig {
    /// Full URL of the multimodal generation endpoint used for ASR and TTS
    pub fn multimodal_url(&self) -> String {
        format!(
            "{}/services/aigc/multimodal-generation/generation",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("Speech base URL must not be empty".to_string());
        }

        if self.stt_model.trim().is_empty() || self.tts_model.trim().is_empty() {
            return Err("Speech model names must not be empty".to_string());
        }

        if self.default_voice.trim().is_empty() {
            return Err("Default voice must not be empty".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
