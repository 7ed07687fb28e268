//! Chat configuration from TOML (`[chat]` section)

use ragchat_domain::ChatMode;
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Start conversations with retrieval enabled
    pub rag: bool,
    /// Directory holding `chat.template` / `rag.template` overrides
    pub templates_dir: Option<String>,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            rag: true,
            templates_dir: None,
        }
    }
}

impl FileChatConfig {
    pub fn mode(&self) -> ChatMode {
        ChatMode::from_rag_flag(self.rag)
    }
}
