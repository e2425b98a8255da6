//! Application services - Use case implementations

mod voice_chat_service;

pub use voice_chat_service::{VoiceChatOutcome, VoiceChatService};
