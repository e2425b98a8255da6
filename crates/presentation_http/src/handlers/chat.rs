//! Voice chat handler
//!
//! Accepts a multipart upload with one `audio` field, runs it through the
//! relay pipeline and answers with the recognized text, the reply and where
//! to fetch the spoken reply.

use std::time::Instant;

use application::ApplicationError;
use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use domain::{AudioFormat, AudioPayload};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{error::ApiError, state::AppState};

/// Name of the multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

/// Chat response body; field order is part of the contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// What the user said
    pub user_text: String,
    /// What the companion answered
    pub reply_text: String,
    /// Remote URL or local public path of the spoken reply
    pub reply_audio_url: String,
}

/// Handle a voice chat request
#[instrument(skip_all)]
pub async fn chat(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let started = Instant::now();
    state.metrics.request_start();

    let result = handle_chat(&state, multipart).await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            state.metrics.record_failure(err.stage());
            err.status_code()
        },
    };
    let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    state.metrics.request_end(elapsed_us, status.as_u16());

    result.map(Json)
}

async fn handle_chat(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ChatResponse, ApiError> {
    let payload = read_audio_field(multipart).await?;
    let outcome = state.voice_chat.process(payload).await?;

    info!(
        exchange_id = %outcome.exchange.id,
        processing_time_ms = outcome.processing_time_ms,
        local_audio = outcome.reply_audio.is_local(),
        "Voice chat answered"
    );

    Ok(ChatResponse {
        reply_audio_url: outcome.reply_audio.as_str().to_string(),
        user_text: outcome.user_text,
        reply_text: outcome.reply_text,
    })
}

/// Pull the `audio` field out of the form
///
/// The declared content type is checked before the body is read, so a
/// rejected upload is never buffered.
async fn read_audio_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<AudioPayload, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        ApplicationError::InvalidInput(format!(
            "expected a multipart/form-data body: {}",
            rejection.body_text()
        ))
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AUDIO_FIELD) {
            debug!(field = ?field.name(), "Skipping unrelated form field");
            continue;
        }

        let format =
            AudioFormat::from_content_type(field.content_type()).map_err(ApplicationError::from)?;
        let data = field.bytes().await.map_err(multipart_error)?;
        debug!(size_bytes = data.len(), %format, "Audio field buffered");

        let payload = AudioPayload::new(data.to_vec(), format).map_err(ApplicationError::from)?;
        return Ok(payload);
    }

    Err(ApplicationError::InvalidInput(format!("missing multipart field `{AUDIO_FIELD}`")).into())
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApplicationError::InvalidInput(format!("unreadable multipart body: {}", err.body_text()))
            .into()
    }
}
