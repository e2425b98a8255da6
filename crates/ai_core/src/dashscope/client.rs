//! DashScope text generation client

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::InferenceConfig,
    error::InferenceError,
    ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage},
};

/// Inference engine backed by the hosted DashScope generation API
pub struct DashScopeInferenceEngine {
    client: Client,
    config: InferenceConfig,
    api_key: SecretString,
}

impl fmt::Debug for DashScopeInferenceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashScopeInferenceEngine")
            .field("config", &self.config)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl DashScopeInferenceEngine {
    /// Create a new DashScope inference engine
    pub fn new(config: InferenceConfig, api_key: SecretString) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized DashScope inference engine"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Get the model to use for a request
    fn resolve_model<'a>(&'a self, request: &'a InferenceRequest) -> &'a str {
        request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model)
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
    parameters: GenerationParameters<'a>,
}

#[derive(Debug, Serialize)]
struct GenerationInput<'a> {
    messages: &'a [InferenceMessage],
}

#[derive(Debug, Serialize)]
struct GenerationParameters<'a> {
    result_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    output: Option<GenerationOutput>,
    usage: Option<GenerationUsage>,
    request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    choices: Vec<GenerationChoice>,
}

#[derive(Debug, Deserialize)]
struct GenerationChoice {
    message: Option<GenerationMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
    total_tokens: Option<u32>,
}

impl From<GenerationUsage> for TokenUsage {
    fn from(usage: GenerationUsage) -> Self {
        Self {
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
            total_tokens: usage
                .total_tokens
                .unwrap_or_else(|| usage.input_tokens.saturating_add(usage.output_tokens)),
        }
    }
}

#[async_trait]
impl InferenceEngine for DashScopeInferenceEngine {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        let model = self.resolve_model(&request).to_string();
        let body = GenerationRequest {
            model: &model,
            input: GenerationInput {
                messages: &request.messages,
            },
            parameters: GenerationParameters {
                result_format: &self.config.result_format,
                temperature: request.temperature.or(self.config.temperature),
                max_tokens: self.config.max_tokens,
            },
        };

        debug!(messages = request.messages.len(), "Sending generation request");

        let response = self
            .client
            .post(self.config.generation_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::from_transport(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Generation request failed");
            return Err(InferenceError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| InferenceError::from_transport(&e, self.config.timeout_ms))?;
        let parsed: GenerationResponse = serde_json::from_str(&text)
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let choice = parsed
            .output
            .and_then(|output| output.choices.into_iter().next())
            .ok_or_else(|| InferenceError::InvalidResponse("missing output.choices[0]".into()))?;
        let content = choice
            .message
            .and_then(|message| message.content)
            .ok_or_else(|| {
                InferenceError::InvalidResponse("missing output.choices[0].message.content".into())
            })?;

        let usage = parsed.usage.map(TokenUsage::from);
        debug!(tokens = ?usage, request_id = ?parsed.request_id, "Generation completed");

        Ok(InferenceResponse {
            content: content.trim().to_string(),
            model,
            usage,
            finish_reason: choice.finish_reason,
            request_id: parsed.request_id,
        })
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
