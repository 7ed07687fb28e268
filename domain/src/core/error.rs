//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown chat mode: {0}")]
    UnknownMode(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::UnknownTemplate("summary".to_string()).to_string(),
            "Unknown template: summary"
        );
        assert_eq!(
            DomainError::UnknownMode("fast".to_string()).to_string(),
            "Unknown chat mode: fast"
        );
    }
}
