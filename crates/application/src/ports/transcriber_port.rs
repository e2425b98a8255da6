//! Transcriber port - Interface for speech recognition by URL

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for recognizing speech in a publicly reachable audio file
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriberPort: Send + Sync {
    /// Recognize the speech at `audio_url`
    ///
    /// # Arguments
    /// * `audio_url` - Dereferenceable URL of the uploaded audio
    ///
    /// # Returns
    /// The recognized text, trimmed
    async fn transcribe(&self, audio_url: &str) -> Result<String, ApplicationError>;
}
