//! Application layer - Use cases and orchestration
//!
//! Defines the capability ports the relay needs (publish, transcribe,
//! generate, synthesize) and the service that drives one voice exchange
//! through them in order.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
