//! Document store port
//!
//! Management operations on the collection behind the vector store. These
//! are not used by chat turns; the CLI exposes them for inspecting and
//! curating what retrieval can find.

use super::service_error::ServiceError;
use async_trait::async_trait;
use ragchat_domain::{CollectionInfo, Metadata, StoreHealth, StoredDocument};

#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Name and size of the collection.
    async fn info(&self) -> Result<CollectionInfo, ServiceError>;

    /// Every stored document.
    async fn list(&self) -> Result<Vec<StoredDocument>, ServiceError>;

    /// Embed and store a document, returning its new id.
    async fn add(&self, content: &str, metadata: Metadata) -> Result<String, ServiceError>;

    /// Delete documents by id, returning how many were removed.
    async fn delete(&self, ids: &[String]) -> Result<usize, ServiceError>;

    /// Remove every document, returning the server's summary message.
    async fn clear(&self) -> Result<String, ServiceError>;

    /// Service health.
    async fn health(&self) -> Result<StoreHealth, ServiceError>;
}
