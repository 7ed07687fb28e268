//! Application-level configuration.
//!
//! Settings that control how the chat use cases behave, independent of
//! where they were loaded from.

use ragchat_domain::{ChatMode, DEFAULT_N_RESULTS};

/// Default number of matches printed by a document search.
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Chat behavior configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatSettings {
    /// Mode for turns started before the user changes it.
    pub mode: ChatMode,
    /// Documents retrieved as context for each RAG turn.
    pub n_results: usize,
    /// Documents shown by a standalone search.
    pub search_results: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            mode: ChatMode::default(),
            n_results: DEFAULT_N_RESULTS,
            search_results: DEFAULT_SEARCH_RESULTS,
        }
    }
}

impl ChatSettings {
    pub fn with_mode(mut self, mode: ChatMode) -> Self {
        self.mode = mode;
        self
    }
}
