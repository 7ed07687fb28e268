//! Vector store port
//!
//! Similarity search over the documents backing retrieval.

use super::service_error::ServiceError;
use async_trait::async_trait;

/// Nearest-neighbour lookup by embedding
#[async_trait]
pub trait VectorStorePort: Send + Sync {
    /// Return the text of up to `n_results` documents closest to `vector`,
    /// best match first.
    async fn query(&self, vector: &[f64], n_results: usize) -> Result<Vec<String>, ServiceError>;
}
