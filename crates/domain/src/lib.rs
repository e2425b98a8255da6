//! Domain layer for the voice companion relay
//!
//! Contains the request-scoped entities, value objects, and domain errors.
//! Nothing in this layer performs I/O; every value here lives at most as long
//! as one inbound voice exchange.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
