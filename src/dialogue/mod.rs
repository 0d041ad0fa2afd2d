//! Conversation state, reply payloads and the per-turn dispatcher.

pub mod context;
pub mod engine;
pub mod format;
pub mod messages;
pub mod reply;
