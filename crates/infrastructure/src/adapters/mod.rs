//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod dashscope_inference_adapter;
mod oss_audio_publisher;
mod speech_adapter;

pub use dashscope_inference_adapter::DashScopeInferenceAdapter;
pub use oss_audio_publisher::OssAudioPublisher;
pub use speech_adapter::SpeechAdapter;
