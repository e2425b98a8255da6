//! Synthesizer port - Interface for turning the reply into audio

use async_trait::async_trait;
use domain::SynthesizedAudioRef;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for speech synthesis
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SynthesizerPort: Send + Sync {
    /// Synthesize `text` and return where the audio can be fetched
    ///
    /// Implementations prefer a remote URL; inline audio is persisted locally
    /// and returned as `SynthesizedAudioRef::Local`.
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudioRef, ApplicationError>;
}
