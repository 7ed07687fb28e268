//! Errors reported by remote services (model server, vector store).

use thiserror::Error;

/// A failed call to a remote service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never got a usable answer (connection refused, reset, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered but the body was not what we expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}
