//! Prompt templates and `{{key}}` substitution

use crate::core::error::DomainError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Placeholder key for the user's message.
pub const USER_QUESTION: &str = "userQuestion";
/// Placeholder key for retrieved context.
pub const CONTEXT: &str = "context";

/// Identifier of a prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    /// Plain chat: only `{{userQuestion}}`
    Chat,
    /// Retrieval-augmented: `{{context}}` and `{{userQuestion}}`
    Rag,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Chat => "chat",
            TemplateName::Rag => "rag",
        }
    }

    /// File name the template is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.template", self.as_str())
    }

    /// Text used when no template file overrides it.
    pub fn builtin(&self) -> &'static str {
        match self {
            TemplateName::Chat => BUILTIN_CHAT,
            TemplateName::Rag => BUILTIN_RAG,
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(TemplateName::Chat),
            "rag" => Ok(TemplateName::Rag),
            other => Err(DomainError::UnknownTemplate(other.to_string())),
        }
    }
}

const BUILTIN_CHAT: &str = r#"You are a helpful, friendly assistant. Answer the user's message clearly and concisely.

User: {{userQuestion}}
Assistant:"#;

const BUILTIN_RAG: &str = r#"You are a helpful assistant. Use the context below to answer the user's question.
If the context is empty or does not contain the answer, say so and answer from your general knowledge.
{{context}}

Question: {{userQuestion}}
Answer:"#;

/// Key/value pairs substituted into a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    values: HashMap<String, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Replace every `{{key}}` in `template` with its value from `context`.
///
/// Substitution is a single left-to-right pass, so substituted values are
/// never re-scanned. Placeholders whose key is missing from `context` are
/// left in the output untouched, and unreferenced keys are ignored.
pub fn render(template: &str, context: &PromptContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        match context.get(&after_open[..close]) {
            Some(value) => {
                out.push_str(value);
                rest = &after_open[close + 2..];
            }
            // Not a placeholder; a real one may start at the next brace.
            None => {
                out.push('{');
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}
