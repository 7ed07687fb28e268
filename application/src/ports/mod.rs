//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod document_store;
pub mod embedding;
pub mod generation;
pub mod observer;
pub mod service_error;
pub mod template_store;
pub mod vector_store;
