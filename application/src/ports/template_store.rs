//! Template store port

use async_trait::async_trait;
use ragchat_domain::TemplateName;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to read template {name}: {message}")]
    Io { name: String, message: String },
}

/// Source of prompt template text
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn load(&self, name: TemplateName) -> Result<String, TemplateError>;
}

/// Serves the templates compiled into the binary.
pub struct BuiltinTemplates;

#[async_trait]
impl TemplateStore for BuiltinTemplates {
    async fn load(&self, name: TemplateName) -> Result<String, TemplateError> {
        Ok(name.builtin().to_string())
    }
}
