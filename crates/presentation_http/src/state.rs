//! Application state shared across handlers

use std::{path::PathBuf, sync::Arc};

use application::VoiceChatService;

use crate::handlers::metrics::MetricsCollector;

/// Local file served when synthesis only returned inline audio
#[derive(Debug, Clone)]
pub struct FallbackAudio {
    /// Where the synthesis adapter writes the decoded audio
    pub file_path: PathBuf,
    /// Route the file is served under
    pub public_path: String,
}

impl FallbackAudio {
    pub fn new(file_path: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            public_path: public_path.into(),
        }
    }

    /// Public path with exactly one leading slash, as axum requires
    pub fn route_path(&self) -> String {
        format!("/{}", self.public_path.trim_start_matches('/'))
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Voice pipeline
    pub voice_chat: Arc<VoiceChatService>,

    /// Request and per-stage failure counters
    pub metrics: Arc<MetricsCollector>,

    /// Inline synthesis fallback file
    pub fallback_audio: FallbackAudio,

    /// Upper bound for a `/chat` request body in bytes
    pub max_upload_bytes: usize,
}
