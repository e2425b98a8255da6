//! Object storage configuration for publishing uploaded audio.
//!
//! Writes go through the S3-compatible OSS endpoint, reads happen through a
//! public bucket URL. The two are configured separately and both default to
//! the same region.

use reqwest::Url;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Object storage configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket name
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// OSS region id, e.g. `oss-cn-shanghai`
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint used for writes (default: `https://{region}.aliyuncs.com`)
    #[serde(default)]
    pub write_endpoint: Option<String>,

    /// Base URL of publicly readable objects (default: `https://{bucket}.{region}.aliyuncs.com`)
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Key prefix ("directory") for uploaded clips
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Address the bucket as `{endpoint}/{bucket}` instead of a bucket subdomain
    #[serde(default)]
    pub path_style: bool,

    /// Access key id (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub access_key_id: Option<SecretString>,

    /// Access key secret (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub access_key_secret: Option<SecretString>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("write_endpoint", &self.write_endpoint)
            .field("public_base_url", &self.public_base_url)
            .field("key_prefix", &self.key_prefix)
            .field("path_style", &self.path_style)
            .field(
                "access_key_id",
                &if self.access_key_id.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field(
                "access_key_secret",
                &if self.access_key_secret.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .finish()
    }
}

fn default_bucket() -> String {
    "ai-lover-audio".to_string()
}

fn default_region() -> String {
    "oss-cn-shanghai".to_string()
}

fn default_key_prefix() -> String {
    "audio".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: default_region(),
            write_endpoint: None,
            public_base_url: None,
            key_prefix: default_key_prefix(),
            path_style: false,
            access_key_id: None,
            access_key_secret: None,
        }
    }
}

impl StorageConfig {
    /// Endpoint used for writes
    pub fn resolved_write_endpoint(&self) -> String {
        self.write_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .map_or_else(
                || format!("https://{}.aliyuncs.com", self.region),
                |e| e.trim_end_matches('/').to_string(),
            )
    }

    /// Base URL under which uploaded objects are publicly readable
    pub fn resolved_public_base_url(&self) -> String {
        self.public_base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map_or_else(
                || format!("https://{}.{}.aliyuncs.com", self.bucket, self.region),
                |u| u.trim_end_matches('/').to_string(),
            )
    }

    /// Whether both halves of the access-key pair are present
    pub const fn has_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.access_key_secret.is_some()
    }

    /// Region pair `(write, public)` when both URLs name an OSS region that differs
    pub fn region_mismatch(&self) -> Option<(String, String)> {
        let write = oss_region_of(&self.resolved_write_endpoint())?;
        let public = oss_region_of(&self.resolved_public_base_url())?;
        (write != public).then_some((write, public))
    }
}

/// Extract the `oss-*` region label from an OSS hostname
///
/// Returns `None` for hosts that are not OSS (custom domains, local mocks).
pub fn oss_region_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    host.split('.')
        .find(|label| label.starts_with("oss-"))
        .map(|label| label.trim_end_matches("-internal").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_share_one_region() {
        let config = StorageConfig::default();
        assert_eq!(
            config.resolved_write_endpoint(),
            "https://oss-cn-shanghai.aliyuncs.com"
        );
        assert_eq!(
            config.resolved_public_base_url(),
            "https://ai-lover-audio.oss-cn-shanghai.aliyuncs.com"
        );
        assert!(config.region_mismatch().is_none());
    }

    #[test]
    fn explicit_endpoints_are_used_verbatim() {
        let config = StorageConfig {
            write_endpoint: Some("http://127.0.0.1:9000/".to_string()),
            public_base_url: Some("https://cdn.example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_write_endpoint(), "http://127.0.0.1:9000");
        assert_eq!(config.resolved_public_base_url(), "https://cdn.example.com");
        assert!(config.region_mismatch().is_none());
    }

    #[test]
    fn detects_shanghai_write_beijing_read() {
        let config = StorageConfig {
            public_base_url: Some("https://ai-lover-audio.oss-cn-beijing.aliyuncs.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.region_mismatch(),
            Some(("oss-cn-shanghai".to_string(), "oss-cn-beijing".to_string()))
        );
    }

    #[test]
    fn oss_region_extraction() {
        assert_eq!(
            oss_region_of("https://oss-cn-hangzhou-internal.aliyuncs.com").as_deref(),
            Some("oss-cn-hangzhou")
        );
        assert_eq!(oss_region_of("http://localhost:9000"), None);
        assert_eq!(oss_region_of("not a url"), None);
    }

    #[test]
    fn debug_redacts_keys() {
        let config = StorageConfig {
            access_key_id: Some(SecretString::from("LTAI-id")),
            access_key_secret: Some(SecretString::from("super-secret")),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("LTAI-id"));
        assert!(!debug.contains("super-secret"));
        assert!(config.has_credentials());
    }
}
