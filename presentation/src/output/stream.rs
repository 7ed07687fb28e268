//! Incremental printing of accumulated text.
//!
//! Streamed responses arrive as the full text so far. [`StreamPrinter`]
//! remembers what is already on screen and works out what to print next.

/// What to do with the terminal after a new accumulated text arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Print this suffix after what is already shown.
    Append(String),
    /// The text no longer extends what was shown; print it afresh.
    Replace(String),
    /// Nothing new.
    Unchanged,
}

#[derive(Debug, Default)]
pub struct StreamPrinter {
    shown: String,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, text: &str) -> StreamUpdate {
        if text == self.shown {
            return StreamUpdate::Unchanged;
        }
        let update = match text.strip_prefix(self.shown.as_str()) {
            Some(suffix) => StreamUpdate::Append(suffix.to_string()),
            None => StreamUpdate::Replace(text.to_string()),
        };
        self.shown = text.to_string();
        update
    }

    pub fn shown(&self) -> &str {
        &self.shown
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn reset(&mut self) {
        self.shown.clear();
    }
}
