//! Domain entities - Objects with identity and lifecycle

mod audio;
mod voice_exchange;

pub use audio::{AudioFormat, AudioPayload, SynthesizedAudioRef};
pub use voice_exchange::{ExchangeFailure, ExchangeStage, ExchangeStatus, VoiceExchange};
