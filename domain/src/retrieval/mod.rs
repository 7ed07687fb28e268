//! Retrieval domain
//!
//! - [`context`] formats retrieved documents for the RAG prompt
//! - [`documents`] describes what the vector store holds

pub mod context;
pub mod documents;

pub use context::{CONTEXT_HEADER, DEFAULT_N_RESULTS, DOCUMENT_SEPARATOR, format_context};
pub use documents::{CollectionInfo, Metadata, StoreHealth, StoredDocument};
