//! Retrieval use case.
//!
//! Embeds a query, looks up the nearest documents and formats them as
//! prompt context. The two remote calls run strictly in sequence: a failed
//! embedding never reaches the vector store.

use crate::ports::embedding::EmbeddingPort;
use crate::ports::service_error::ServiceError;
use crate::ports::vector_store::VectorStorePort;
use ragchat_domain::util::preview;
use ragchat_domain::{DEFAULT_N_RESULTS, format_context};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while retrieving context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Failed to get embedding from Ollama: {0}")]
    Embedding(#[source] ServiceError),

    #[error("Failed to query vector store: {0}")]
    VectorStore(#[source] ServiceError),
}

/// Formatted context string, or why it could not be produced.
pub type RetrievalResult = Result<String, RetrievalError>;

/// Embedding + similarity search pipeline
#[derive(Clone)]
pub struct RetrievalPipeline {
    embedding: Arc<dyn EmbeddingPort>,
    vector_store: Arc<dyn VectorStorePort>,
    n_results: usize,
}

impl RetrievalPipeline {
    pub fn new(embedding: Arc<dyn EmbeddingPort>, vector_store: Arc<dyn VectorStorePort>) -> Self {
        Self {
            embedding,
            vector_store,
            n_results: DEFAULT_N_RESULTS,
        }
    }

    /// Number of documents requested for chat context.
    pub fn with_n_results(mut self, n_results: usize) -> Self {
        self.n_results = n_results;
        self
    }

    pub fn n_results(&self) -> usize {
        self.n_results
    }

    /// Retrieve context for `query`, formatted for the RAG template.
    ///
    /// Zero matching documents is a success with an empty context.
    pub async fn retrieve(&self, query: &str) -> RetrievalResult {
        let documents = self.search(query, self.n_results).await?;
        Ok(format_context(&documents))
    }

    /// Return the text of up to `n_results` documents closest to `query`.
    pub async fn search(
        &self,
        query: &str,
        n_results: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        debug!("Embedding query: {}", preview(query, 80));
        let vector = self.embedding.embed(query).await.map_err(|e| {
            warn!("Embedding failed: {}", e);
            RetrievalError::Embedding(e)
        })?;

        debug!("Querying vector store ({} dims, n={})", vector.len(), n_results);
        let documents = self
            .vector_store
            .query(&vector, n_results)
            .await
            .map_err(|e| {
                warn!("Vector store query failed: {}", e);
                RetrievalError::VectorStore(e)
            })?;

        debug!("Retrieved {} documents", documents.len());
        Ok(documents)
    }
}
