//! Embedding port
//!
//! Turns text into a vector for similarity search.

use super::service_error::ServiceError;
use async_trait::async_trait;

/// Computes embeddings for text
#[async_trait]
pub trait EmbeddingPort: Send + Sync {
    /// Embed `text` with the configured embedding model.
    async fn embed(&self, text: &str) -> Result<Vec<f64>, ServiceError>;
}
