//! Generation outcome value object

/// Outcome of one streamed generation (Value Object)
///
/// `text` is everything accumulated up to completion or failure; on failure
/// `error` carries the transport's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    pub fn failure(text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
