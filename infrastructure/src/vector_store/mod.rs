//! Vector store service adapter.
//!
//! [`VectorStoreClient`] speaks to the embeddings server that fronts the
//! document collection: similarity queries for retrieval, plus the
//! management endpoints used by `ragchat docs` and `ragchat health`.

mod client;

pub use client::VectorStoreClient;
