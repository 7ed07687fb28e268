//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod chat;
mod logging;
mod ollama;
mod repl;
mod vector_store;

pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use ollama::{DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, FileOllamaConfig};
pub use repl::FileReplConfig;
pub use vector_store::{DEFAULT_VECTOR_STORE_URL, FileVectorStoreConfig};

use ragchat_application::ChatSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model server settings
    pub ollama: FileOllamaConfig,
    /// Vector store settings
    pub vector_store: FileVectorStoreConfig,
    /// Chat behaviour
    pub chat: FileChatConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

/// A problem found in the loaded configuration.
///
/// Issues are warnings: the application still starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending setting, e.g. `ollama.model`.
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (field, value) in [
            ("ollama.model", &self.ollama.model),
            ("ollama.embedding_model", &self.ollama.embedding_model),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::new(field, "model name cannot be empty"));
            }
        }

        for (field, value) in [
            ("ollama.base_url", &self.ollama.base_url),
            ("vector_store.base_url", &self.vector_store.base_url),
        ] {
            if let Some(issue) = check_url(field, value) {
                issues.push(issue);
            }
        }

        if self.vector_store.n_results == 0 {
            issues.push(ConfigIssue::new(
                "vector_store.n_results",
                "0 documents per retrieval leaves RAG prompts without context",
            ));
        }
        if self.vector_store.search_results == 0 {
            issues.push(ConfigIssue::new(
                "vector_store.search_results",
                "search would never return a match",
            ));
        }

        issues
    }

    /// Chat behaviour for the application layer.
    pub fn chat_settings(&self) -> ChatSettings {
        ChatSettings {
            mode: self.chat.mode(),
            n_results: self.vector_store.n_results,
            search_results: self.vector_store.search_results,
        }
    }

    pub fn templates_dir(&self) -> Option<PathBuf> {
        self.chat.templates_dir.as_deref().map(expand_home)
    }

    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        self.logging.conversation_log.as_deref().map(expand_home)
    }
}

fn check_url(field: &str, value: &str) -> Option<ConfigIssue> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => None,
        Ok(url) => Some(ConfigIssue::new(
            field,
            format!("unsupported scheme '{}' in '{}'", url.scheme(), value),
        )),
        Err(e) => Some(ConfigIssue::new(
            field,
            format!("invalid URL '{}': {}", value, e),
        )),
    }
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
