//! Application layer for ragchat
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::ChatSettings;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    document_store::DocumentStorePort,
    embedding::EmbeddingPort,
    generation::{ByteStream, GenerationPort},
    observer::{ChannelObserver, ConversationObserver, NoObserver, SessionEvent, TurnOutcome},
    service_error::ServiceError,
    template_store::{BuiltinTemplates, TemplateError, TemplateStore},
    vector_store::VectorStorePort,
};
pub use use_cases::generation::GenerationClient;
pub use use_cases::orchestrator::ResponseOrchestrator;
pub use use_cases::prompt_builder::{PromptBuilder, PromptError};
pub use use_cases::retrieval::{RetrievalError, RetrievalPipeline, RetrievalResult};
pub use use_cases::session::ConversationSession;
