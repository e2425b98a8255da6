//! DashScope inference adapter - Implements GeneratorPort using ai_core

use std::sync::Arc;
use std::time::Instant;

use ai_core::{
    DashScopeInferenceEngine, InferenceConfig, InferenceEngine, InferenceError, InferenceRequest,
};
use application::{error::ApplicationError, ports::GeneratorPort};
use async_trait::async_trait;
use domain::ExchangeStage;
use secrecy::SecretString;
use tracing::{debug, instrument};

/// Adapter answering user text in the configured persona
pub struct DashScopeInferenceAdapter {
    engine: Arc<dyn InferenceEngine>,
    system_prompt: String,
}

impl std::fmt::Debug for DashScopeInferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashScopeInferenceAdapter")
            .field("model", &self.engine.default_model())
            .field("system_prompt_len", &self.system_prompt.len())
            .finish()
    }
}

impl DashScopeInferenceAdapter {
    /// Create a new adapter with the given configuration
    pub fn new(config: InferenceConfig, api_key: SecretString) -> Result<Self, ApplicationError> {
        let system_prompt = config.system_prompt.clone();
        let engine = DashScopeInferenceEngine::new(config, api_key)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        Ok(Self::with_engine(Arc::new(engine), system_prompt))
    }

    /// Wrap an existing engine
    pub fn with_engine(engine: Arc<dyn InferenceEngine>, system_prompt: impl Into<String>) -> Self {
        Self {
            engine,
            system_prompt: system_prompt.into(),
        }
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::ServerError { status, body } => ApplicationError::GenerationFailed {
                status: Some(status),
                message: body,
            },
            InferenceError::InvalidResponse(message) => ApplicationError::ResponseParseError {
                stage: ExchangeStage::Generation,
                message,
            },
            InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
            other @ (InferenceError::Timeout(_)
            | InferenceError::ConnectionFailed(_)
            | InferenceError::RequestFailed(_)) => ApplicationError::GenerationFailed {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

#[async_trait]
impl GeneratorPort for DashScopeInferenceAdapter {
    #[instrument(skip(self, user_text), fields(text_len = user_text.len()))]
    async fn generate(&self, user_text: &str) -> Result<String, ApplicationError> {
        let start = Instant::now();
        let request = InferenceRequest::with_system(&self.system_prompt, user_text);

        let response = self
            .engine
            .generate(request)
            .await
            .map_err(Self::map_error)?;

        debug!(
            model = %response.model,
            tokens = ?response.usage.as_ref().map(|u| u.total_tokens),
            latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Reply generated"
        );

        Ok(response.content)
    }
}
