//! Vector store contents as seen by management commands.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to a stored document.
pub type Metadata = Map<String, Value>;

/// Metadata may be absent or `null` on the wire; both mean "none".
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Metadata, D::Error> {
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}

/// A document held by the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: Metadata,
}

impl StoredDocument {
    /// Case-insensitive match against the document's content or id.
    ///
    /// An empty filter matches everything.
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.content.to_lowercase().contains(&needle) || self.id.to_lowercase().contains(&needle)
    }
}

/// Summary of the collection backing retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: Metadata,
}

/// Health report of the vector store service.
///
/// Healthy reports carry the collection fields; unhealthy ones carry `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreHealth {
    pub status: String,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub document_count: Option<u64>,
    #[serde(default)]
    pub ollama_available: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StoreHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
