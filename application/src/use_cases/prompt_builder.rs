//! Prompt building use case.
//!
//! Selects the template for the turn's mode, gathers the values it needs
//! and renders the final prompt text.

use super::retrieval::{RetrievalError, RetrievalPipeline};
use crate::ports::template_store::{TemplateError, TemplateStore};
use ragchat_domain::prompt::{CONTEXT, USER_QUESTION};
use ragchat_domain::{ChatMode, PromptContext, render};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while building a prompt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

pub struct PromptBuilder {
    templates: Arc<dyn TemplateStore>,
    retrieval: RetrievalPipeline,
}

impl PromptBuilder {
    pub fn new(templates: Arc<dyn TemplateStore>, retrieval: RetrievalPipeline) -> Self {
        Self {
            templates,
            retrieval,
        }
    }

    pub fn retrieval(&self) -> &RetrievalPipeline {
        &self.retrieval
    }

    /// Build the prompt for `user_text` in `mode`.
    ///
    /// In RAG mode retrieval runs before the template is loaded; a retrieval
    /// failure aborts the build.
    pub async fn build(&self, mode: ChatMode, user_text: &str) -> Result<String, PromptError> {
        let mut values = PromptContext::new().with(USER_QUESTION, user_text);

        if mode.is_rag() {
            let context = self.retrieval.retrieve(user_text).await?;
            values = values.with(CONTEXT, context);
        }

        let template = self.templates.load(mode.template()).await?;
        let prompt = render(&template, &values);
        debug!("Built {} prompt ({} bytes)", mode, prompt.len());
        Ok(prompt)
    }
}
