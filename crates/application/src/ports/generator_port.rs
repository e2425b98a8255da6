//! Generator port - Interface for producing the companion's reply

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for text generation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeneratorPort: Send + Sync {
    /// Generate a reply to what the user said
    async fn generate(&self, user_text: &str) -> Result<String, ApplicationError>;
}
