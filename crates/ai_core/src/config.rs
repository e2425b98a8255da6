//! Configuration for inference engine

use serde::{Deserialize, Serialize};

/// Persona the companion answers in
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "你是一个温柔、可爱的虚拟恋人，说话带点撒娇和关心，用简短自然的中文回复。";

/// Configuration for the inference engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the DashScope API (up to and including `/api/v1`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default model to use
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// System prompt sent ahead of every user turn
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Result format requested from the service
    #[serde(default = "default_result_format")]
    pub result_format: String,

    /// Sampling temperature, left to the service default when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens, left to the service default when unset
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1".to_string()
}

fn default_model() -> String {
    "qwen-max".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_result_format() -> String {
    "message".to_string()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_model: default_model(),
            timeout_ms: default_timeout_ms(),
            system_prompt: default_system_prompt(),
            result_format: default_result_format(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl InferenceConfig {
    /// Full URL of the text generation endpoint
    pub fn generation_url(&self) -> String {
        format!(
            "{}/services/aigc/text-generation/generation",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = InferenceConfig::default();
        assert_eq!(config.base_url, "https://dashscope.aliyuncs.com/api/v1");
        assert_eq!(config.default_model, "qwen-max");
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.result_format, "message");
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(config.temperature.is_none());
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn generation_url_tolerates_trailing_slash() {
        let config = InferenceConfig {
            base_url: "http://localhost:9000/api/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.generation_url(),
            "http://localhost:9000/api/v1/services/aigc/text-generation/generation"
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: InferenceConfig =
            serde_json::from_str(r#"{"default_model": "qwen-plus"}"#).unwrap();
        assert_eq!(config.default_model, "qwen-plus");
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }
}
