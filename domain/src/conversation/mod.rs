//! Conversation domain.
//!
//! - [`message::Message`]: a single User or Assistant message
//! - [`log::MessageLog`]: ordered conversation log
//! - [`mode::ChatMode`]: plain chat or retrieval-augmented
//! - [`state::ConversationState`]: log plus the response state machine

pub mod log;
pub mod message;
pub mod mode;
pub mod state;
