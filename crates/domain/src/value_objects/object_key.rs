//! Object storage keys for published audio
//!
//! Every upload gets its own key so concurrent requests never overwrite each
//! other in the shared bucket.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key of an uploaded audio object, e.g. `audio/3f2a...c9.wav`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// File extension appended to every generated key
    pub const EXTENSION: &'static str = "wav";

    /// Generate a fresh key under `prefix` from a random 128-bit identifier
    ///
    /// The identifier is rendered as 32 lowercase hex characters. Leading and
    /// trailing slashes on the prefix are ignored; an empty prefix puts the
    /// object at the bucket root.
    pub fn generate(prefix: &str) -> Self {
        let id = Uuid::new_v4().simple();
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            Self(format!("{id}.{}", Self::EXTENSION))
        } else {
            Self(format!("{prefix}/{id}.{}", Self::EXTENSION))
        }
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A published object: its key plus the public URL it can be fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    pub key: ObjectKey,
    pub url: String,
}

impl ObjectReference {
    /// Build a reference by joining the public base URL and the key
    pub fn new(key: ObjectKey, public_base_url: &str) -> Self {
        let url = format!("{}/{}", public_base_url.trim_end_matches('/'), key.as_str());
        Self { key, url }
    }
}
