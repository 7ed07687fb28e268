//! Chat mode value object

use crate::core::error::DomainError;
use crate::prompt::TemplateName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a turn's prompt is built.
///
/// - **Plain**: the user's text is dropped into the `chat` template
/// - **Rag**: context is retrieved from the vector store first and the
///   `rag` template combines both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    Plain,
    #[default]
    Rag,
}

impl ChatMode {
    pub fn from_rag_flag(rag: bool) -> Self {
        if rag { ChatMode::Rag } else { ChatMode::Plain }
    }

    pub fn is_rag(&self) -> bool {
        matches!(self, ChatMode::Rag)
    }

    /// The template this mode fills.
    pub fn template(&self) -> TemplateName {
        match self {
            ChatMode::Plain => TemplateName::Chat,
            ChatMode::Rag => TemplateName::Rag,
        }
    }

    /// Fixed text shown as the Assistant's answer when a turn fails.
    pub fn error_message(&self) -> &'static str {
        match self {
            ChatMode::Plain => "Error getting response from Ollama.",
            ChatMode::Rag => "Error getting response from RAG system.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Plain => "plain",
            ChatMode::Rag => "rag",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "chat" | "off" => Ok(ChatMode::Plain),
            "rag" | "on" => Ok(ChatMode::Rag),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}
