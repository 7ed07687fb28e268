//! Configuration loading for ragchat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Command line flags
//! 2. `RAGCHAT_*` environment variables
//! 3. `--config <path>` specified file
//! 4. Project root: `./ragchat.toml` or `./.ragchat.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/ragchat/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_VECTOR_STORE_URL, FileChatConfig, FileConfig, FileLoggingConfig, FileOllamaConfig,
    FileReplConfig, FileVectorStoreConfig,
};
pub use loader::{
    ChatOverrides, ConfigError, ConfigLoader, ConfigOverrides, ENV_PREFIX, OllamaOverrides,
    VectorStoreOverrides,
};
