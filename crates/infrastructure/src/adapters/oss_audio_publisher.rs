//! OSS audio publisher - Implements AudioPublisherPort over the S3-compatible API

use application::{error::ApplicationError, ports::AudioPublisherPort};
use async_trait::async_trait;
use domain::{AudioPayload, ObjectKey, ObjectReference};
use s3::creds::Credentials;
use s3::{Bucket, Region};
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument, warn};

use crate::config::StorageConfig;

/// Uploads clips to a bucket and hands back their public URL
pub struct OssAudioPublisher {
    bucket: Box<Bucket>,
    public_base_url: String,
    key_prefix: String,
}

impl std::fmt::Debug for OssAudioPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OssAudioPublisher")
            .field("bucket", &self.bucket.name())
            .field("public_base_url", &self.public_base_url)
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl OssAudioPublisher {
    /// Create a publisher from storage configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if credentials are missing or
    /// the bucket handle cannot be built.
    pub fn new(config: &StorageConfig) -> Result<Self, ApplicationError> {
        let (Some(key_id), Some(key_secret)) = (&config.access_key_id, &config.access_key_secret)
        else {
            return Err(ApplicationError::Configuration(
                "storage access key pair is not configured".to_string(),
            ));
        };

        let credentials = Credentials::new(
            Some(key_id.expose_secret()),
            Some(key_secret.expose_secret()),
            None,
            None,
            None,
        )
        .map_err(|e| ApplicationError::Configuration(format!("invalid storage credentials: {e}")))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.resolved_write_endpoint(),
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| ApplicationError::Configuration(format!("invalid bucket: {e}")))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        let public_base_url = config.resolved_public_base_url();
        info!(
            bucket = %config.bucket,
            write_endpoint = %config.resolved_write_endpoint(),
            public_base_url = %public_base_url,
            path_style = config.path_style,
            "Initialized OSS audio publisher"
        );

        Ok(Self {
            bucket,
            public_base_url,
            key_prefix: config.key_prefix.clone(),
        })
    }
}

#[async_trait]
impl AudioPublisherPort for OssAudioPublisher {
    #[instrument(skip(self, payload), fields(size = payload.size_bytes()))]
    async fn publish(&self, payload: &AudioPayload) -> Result<ObjectReference, ApplicationError> {
        let key = ObjectKey::generate(&self.key_prefix);
        debug!(key = %key, "Uploading audio");

        let response = self
            .bucket
            .put_object_with_content_type(key.as_str(), payload.data(), payload.format().mime_type())
            .await
            .map_err(|e| ApplicationError::UploadFailed(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            let body = String::from_utf8_lossy(response.as_slice()).into_owned();
            warn!(status, body = %body, "Audio upload rejected");
            return Err(ApplicationError::UploadFailed(format!(
                "storage returned HTTP {status}: {body}"
            )));
        }

        let reference = ObjectReference::new(key, &self.public_base_url);
        info!(url = %reference.url, "Audio published");
        Ok(reference)
    }
}
