//! Conversation message entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    User,
    Assistant,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::User => write!(f, "You"),
            Participant::Assistant => write!(f, "Assistant"),
        }
    }
}

/// A message in a conversation (Entity)
///
/// Immutable once complete. The one exception is the Assistant entry that a
/// response is currently streaming into, whose text is replaced as chunks
/// arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Participant,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Participant::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Participant::Assistant,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Participant::User
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == Participant::Assistant
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}
