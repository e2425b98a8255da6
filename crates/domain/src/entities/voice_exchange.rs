//! Voice exchange entity
//!
//! Tracks one inbound clip through the pipeline:
//! `Received → Uploaded → Transcribed → Replied → Synthesized → Completed`.
//! Any stage may instead move the exchange to `Failed`, recording which stage
//! broke and why. Terminal states accept no further transitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audio::{AudioFormat, SynthesizedAudioRef};
use crate::errors::DomainError;
use crate::value_objects::{ExchangeId, ObjectReference};

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStage {
    Ingress,
    Upload,
    Transcription,
    Generation,
    Synthesis,
}

impl ExchangeStage {
    /// All stages in pipeline order
    pub const ALL: [Self; 5] = [
        Self::Ingress,
        Self::Upload,
        Self::Transcription,
        Self::Generation,
        Self::Synthesis,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Upload => "upload",
            Self::Transcription => "transcription",
            Self::Generation => "generation",
            Self::Synthesis => "synthesis",
        }
    }
}

impl fmt::Display for ExchangeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing status of a voice exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    /// Audio accepted at ingress and buffered
    Received,
    /// Audio stored and reachable through a public URL
    Uploaded,
    /// Recognized text available
    Transcribed,
    /// Reply text generated
    Replied,
    /// Reply audio reference available
    Synthesized,
    /// Results handed back to the caller
    Completed,
    /// A stage failed; see `VoiceExchange::failure`
    Failed,
}

impl ExchangeStatus {
    /// Check if the status indicates completion
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// The stage that runs next from this status, if any
    #[must_use]
    pub const fn pending_stage(&self) -> Option<ExchangeStage> {
        match self {
            Self::Received => Some(ExchangeStage::Upload),
            Self::Uploaded => Some(ExchangeStage::Transcription),
            Self::Transcribed => Some(ExchangeStage::Generation),
            Self::Replied => Some(ExchangeStage::Synthesis),
            Self::Synthesized | Self::Completed | Self::Failed => None,
        }
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Received => "received",
            Self::Uploaded => "uploaded",
            Self::Transcribed => "transcribed",
            Self::Replied => "replied",
            Self::Synthesized => "synthesized",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Why and where an exchange failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeFailure {
    pub stage: ExchangeStage,
    pub reason: String,
}

/// One voice clip travelling through the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceExchange {
    /// Unique identifier
    pub id: ExchangeId,
    /// Format of the uploaded clip
    pub audio_format: AudioFormat,
    /// Uploaded clip size in bytes
    pub size_bytes: usize,
    /// Current processing status
    pub status: ExchangeStatus,
    /// Published upload (after the upload stage)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectReference>,
    /// Recognized text (after transcription)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    /// Generated reply (after generation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Reply audio reference (after synthesis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_audio: Option<SynthesizedAudioRef>,
    /// Failure details when `status` is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ExchangeFailure>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VoiceExchange {
    /// Start a new exchange for an accepted clip
    #[must_use]
    pub fn received(audio_format: AudioFormat, size_bytes: usize) -> Self {
        let now = Utc::now();
        Self {
            id: ExchangeId::new(),
            audio_format,
            size_bytes,
            status: ExchangeStatus::Received,
            object: None,
            transcription: None,
            reply: None,
            reply_audio: None,
            failure: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn advance(&mut self, expected: ExchangeStatus, next: ExchangeStatus) -> Result<(), DomainError> {
        if self.status != expected {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record the published object
    pub fn mark_uploaded(&mut self, object: ObjectReference) -> Result<(), DomainError> {
        self.advance(ExchangeStatus::Received, ExchangeStatus::Uploaded)?;
        self.object = Some(object);
        Ok(())
    }

    /// Record the recognized text
    pub fn mark_transcribed(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.advance(ExchangeStatus::Uploaded, ExchangeStatus::Transcribed)?;
        self.transcription = Some(text.into());
        Ok(())
    }

    /// Record the generated reply
    pub fn mark_replied(&mut self, reply: impl Into<String>) -> Result<(), DomainError> {
        self.advance(ExchangeStatus::Transcribed, ExchangeStatus::Replied)?;
        self.reply = Some(reply.into());
        Ok(())
    }

    /// Record the reply audio reference
    pub fn mark_synthesized(&mut self, audio: SynthesizedAudioRef) -> Result<(), DomainError> {
        self.advance(ExchangeStatus::Replied, ExchangeStatus::Synthesized)?;
        self.reply_audio = Some(audio);
        Ok(())
    }

    /// Close a fully synthesized exchange
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.advance(ExchangeStatus::Synthesized, ExchangeStatus::Completed)
    }

    /// Move a non-terminal exchange to `Failed`
    pub fn fail(&mut self, stage: ExchangeStage, reason: impl Into<String>) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: ExchangeStatus::Failed,
            });
        }
        self.status = ExchangeStatus::Failed;
        self.failure = Some(ExchangeFailure {
            stage,
            reason: reason.into(),
        });
        self.updated_at = Utc::now();
        Ok(())
    }
}
