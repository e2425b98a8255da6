//! DashScope text generation engine
//!
//! Speaks the native DashScope protocol (`input.messages` in,
//! `output.choices[0].message.content` out) with bearer authentication.

mod client;

pub use client::DashScopeInferenceEngine;
