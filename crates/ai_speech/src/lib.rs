//! AI Speech - Speech recognition and synthesis
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - Recognize speech in audio reachable by URL (ASR)
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - DashScope multimodal generation (`qwen3-asr-flash` and `qwen-tts`)
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{DashScopeSpeechProvider, SpeechToText, TextToSpeech, SynthesizedSpeech};
//!
//! let provider = DashScopeSpeechProvider::new(config, api_key)?;
//!
//! let transcription = provider.transcribe_url("https://bucket.oss/audio/x.wav").await?;
//! match provider.synthesize(&transcription.text, None).await? {
//!     SynthesizedSpeech::Url(url) => println!("{url}"),
//!     SynthesizedSpeech::Inline(bytes) => std::fs::write("reply.wav", bytes)?,
//! }
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::dashscope::DashScopeSpeechProvider;
pub use types::{SynthesizedSpeech, Transcription};
