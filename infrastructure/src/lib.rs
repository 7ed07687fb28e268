//! Infrastructure layer for ragchat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub(crate) mod http;
pub mod logging;
pub mod ollama;
pub mod templates;
pub mod vector_store;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, ConfigOverrides, FileConfig, FileOllamaConfig,
    FileReplConfig, FileVectorStoreConfig,
};
pub use logging::JsonlConversationLogger;
pub use ollama::OllamaClient;
pub use templates::FileTemplateStore;
pub use vector_store::VectorStoreClient;
