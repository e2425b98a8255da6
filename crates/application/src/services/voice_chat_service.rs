//! Voice chat service - Drives one voice exchange through the relay
//!
//! This service orchestrates the complete flow:
//! 1. Publish the uploaded audio and obtain a public URL
//! 2. Recognize the speech behind that URL
//! 3. Generate the companion's reply
//! 4. Synthesize the reply to audio
//!
//! Stages run strictly in order since each consumes the previous output.
//! The first failure aborts the exchange; nothing is retried and no partial
//! result is returned.

use std::{fmt, sync::Arc, time::Instant};

use domain::{AudioPayload, DomainError, ExchangeStage, SynthesizedAudioRef, VoiceExchange};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{AudioPublisherPort, GeneratorPort, SynthesizerPort, TranscriberPort},
};

/// Result of a completed voice exchange
#[derive(Debug)]
pub struct VoiceChatOutcome {
    /// The exchange in its `Completed` state
    pub exchange: VoiceExchange,
    /// What the user said
    pub user_text: String,
    /// What the companion answered
    pub reply_text: String,
    /// Where the spoken answer can be fetched
    pub reply_audio: SynthesizedAudioRef,
    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Service for processing voice exchanges
pub struct VoiceChatService {
    publisher: Arc<dyn AudioPublisherPort>,
    transcriber: Arc<dyn TranscriberPort>,
    generator: Arc<dyn GeneratorPort>,
    synthesizer: Arc<dyn SynthesizerPort>,
}

impl fmt::Debug for VoiceChatService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceChatService").finish_non_exhaustive()
    }
}

impl VoiceChatService {
    /// Create a new voice chat service from its four collaborators
    pub fn new(
        publisher: Arc<dyn AudioPublisherPort>,
        transcriber: Arc<dyn TranscriberPort>,
        generator: Arc<dyn GeneratorPort>,
        synthesizer: Arc<dyn SynthesizerPort>,
    ) -> Self {
        Self {
            publisher,
            transcriber,
            generator,
            synthesizer,
        }
    }

    /// Process an accepted audio payload end-to-end
    #[instrument(skip(self, payload), fields(
        audio_size = payload.size_bytes(),
        format = %payload.format(),
    ))]
    pub async fn process(&self, payload: AudioPayload) -> Result<VoiceChatOutcome, ApplicationError> {
        let start = Instant::now();
        let mut exchange = VoiceExchange::received(payload.format(), payload.size_bytes());
        info!(exchange_id = %exchange.id, "Voice exchange received");

        // Step 1: Publish audio
        let object = match self.publisher.publish(&payload).await {
            Ok(object) => object,
            Err(e) => return Err(Self::abort(&mut exchange, e)),
        };
        drop(payload);
        debug!(key = %object.key, url = %object.url, "Audio published");
        let audio_url = object.url.clone();
        Self::transition(&mut exchange, |ex| ex.mark_uploaded(object))?;

        // Step 2: Recognize speech
        let user_text = match self.transcriber.transcribe(&audio_url).await {
            Ok(text) => text,
            Err(e) => return Err(Self::abort(&mut exchange, e)),
        };
        if user_text.trim().is_empty() {
            let err = ApplicationError::RecognitionFailed {
                status: None,
                message: "no speech recognized".to_string(),
            };
            return Err(Self::abort(&mut exchange, err));
        }
        info!(user_text = %user_text, "User said");
        Self::transition(&mut exchange, |ex| ex.mark_transcribed(user_text.clone()))?;

        // Step 3: Generate reply
        let reply_text = match self.generator.generate(&user_text).await {
            Ok(text) => text,
            Err(e) => return Err(Self::abort(&mut exchange, e)),
        };
        if reply_text.trim().is_empty() {
            let err = ApplicationError::ResponseParseError {
                stage: ExchangeStage::Generation,
                message: "reply text is empty".to_string(),
            };
            return Err(Self::abort(&mut exchange, err));
        }
        info!(reply_text = %reply_text, "Companion replied");
        Self::transition(&mut exchange, |ex| ex.mark_replied(reply_text.clone()))?;

        // Step 4: Synthesize reply
        let reply_audio = match self.synthesizer.synthesize(&reply_text).await {
            Ok(audio) => audio,
            Err(e) => return Err(Self::abort(&mut exchange, e)),
        };
        info!(reply_audio = %reply_audio, local = reply_audio.is_local(), "Reply synthesized");
        Self::transition(&mut exchange, |ex| ex.mark_synthesized(reply_audio.clone()))?;
        Self::transition(&mut exchange, VoiceExchange::complete)?;

        let processing_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            exchange_id = %exchange.id,
            processing_time_ms,
            "Voice exchange complete"
        );

        Ok(VoiceChatOutcome {
            exchange,
            user_text,
            reply_text,
            reply_audio,
            processing_time_ms,
        })
    }

    /// Apply a state transition, aborting the exchange if it is rejected
    fn transition<F>(exchange: &mut VoiceExchange, apply: F) -> Result<(), ApplicationError>
    where
        F: FnOnce(&mut VoiceExchange) -> Result<(), DomainError>,
    {
        apply(exchange).map_err(|e| Self::abort(exchange, e.into()))
    }

    /// Record a stage failure on the exchange and hand the error back
    fn abort(exchange: &mut VoiceExchange, err: ApplicationError) -> ApplicationError {
        let stage = err
            .stage()
            .or_else(|| exchange.status.pending_stage())
            .unwrap_or(ExchangeStage::Ingress);
        warn!(
            exchange_id = %exchange.id,
            stage = %stage,
            kind = err.kind(),
            error = %err,
            "Voice exchange failed"
        );
        if let Err(e) = exchange.fail(stage, err.to_string()) {
            warn!(error = %e, "Could not record exchange failure");
        }
        err
    }
}
