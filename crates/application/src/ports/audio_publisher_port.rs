//! Audio publisher port - Interface for minting public URLs for uploaded audio

use async_trait::async_trait;
use domain::{AudioPayload, ObjectReference};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for publishing uploaded audio to object storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AudioPublisherPort: Send + Sync {
    /// Store the payload under a fresh unique key and return its public URL
    ///
    /// # Errors
    /// Returns `ApplicationError::UploadFailed` on any transport, credential,
    /// or storage-side error. Nothing is retried.
    async fn publish(&self, payload: &AudioPayload) -> Result<ObjectReference, ApplicationError>;
}
