//! Local fallback for synthesized audio that arrives inline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where inline synthesis results are written and served from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisAppConfig {
    /// File the decoded audio is written to (overwritten on every fallback)
    #[serde(default = "default_fallback_file")]
    pub fallback_file: PathBuf,

    /// URL path the HTTP server serves the fallback file under
    #[serde(default = "default_fallback_public_path")]
    pub fallback_public_path: String,

    /// Voice override; the speech default applies when unset
    #[serde(default)]
    pub voice: Option<String>,
}

fn default_fallback_file() -> PathBuf {
    PathBuf::from("output.wav")
}

fn default_fallback_public_path() -> String {
    "/output.wav".to_string()
}

impl Default for SynthesisAppConfig {
    fn default() -> Self {
        Self {
            fallback_file: default_fallback_file(),
            fallback_public_path: default_fallback_public_path(),
            voice: None,
        }
    }
}
