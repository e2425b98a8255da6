//! AI Core - Text generation for the companion persona
//!
//! Provides the inference abstraction and a DashScope-backed engine that
//! talks to the hosted `text-generation` endpoint in message result format.

pub mod config;
pub mod dashscope;
pub mod error;
pub mod ports;

pub use config::InferenceConfig;
pub use dashscope::DashScopeInferenceEngine;
pub use error::InferenceError;
pub use ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
