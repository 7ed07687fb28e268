//! Prompt domain
//!
//! Template identifiers, built-in template text and `{{key}}` rendering.

mod template;

pub use template::{CONTEXT, PromptContext, TemplateName, USER_QUESTION, render};
