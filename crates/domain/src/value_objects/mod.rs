//! Value Objects - Immutable, identity-less domain primitives

mod exchange_id;
mod object_key;

pub use exchange_id::ExchangeId;
pub use object_key::{ObjectKey, ObjectReference};
