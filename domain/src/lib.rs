//! Domain layer for ragchat
//!
//! This crate contains the core conversation logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Turns
//!
//! A turn is one User message and the single Assistant response it receives.
//! [`ConversationState`] decides when a turn is owed and guarantees that at
//! most one response is being generated at a time.
//!
//! ## Modes
//!
//! - **Rag** (default): retrieve context from the vector store, then prompt
//! - **Plain**: prompt the model with the user's message only

pub mod conversation;
pub mod core;
pub mod generation;
pub mod prompt;
pub mod retrieval;
pub mod util;

// Re-export commonly used types
pub use conversation::{
    log::MessageLog,
    message::{Message, Participant},
    mode::ChatMode,
    state::{ConversationState, PendingTurn, Phase},
};
pub use core::error::DomainError;
pub use generation::{
    decoder::{NdjsonDecoder, StreamRecord},
    result::GenerationResult,
};
pub use prompt::{PromptContext, TemplateName, render};
pub use retrieval::{
    CollectionInfo, DEFAULT_N_RESULTS, Metadata, StoreHealth, StoredDocument, format_context,
};
