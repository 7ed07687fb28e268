//! Vector store configuration from TOML (`[vector_store]` section)

use ragchat_application::config::DEFAULT_SEARCH_RESULTS;
use ragchat_domain::DEFAULT_N_RESULTS;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VECTOR_STORE_URL: &str = "http://localhost:8000";

/// Raw vector store configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVectorStoreConfig {
    /// Base URL of the vector store service
    pub base_url: String,
    /// Documents retrieved per RAG turn
    pub n_results: usize,
    /// Default number of matches for `ragchat search`
    pub search_results: usize,
}

impl Default for FileVectorStoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_VECTOR_STORE_URL.to_string(),
            n_results: DEFAULT_N_RESULTS,
            search_results: DEFAULT_SEARCH_RESULTS,
        }
    }
}
