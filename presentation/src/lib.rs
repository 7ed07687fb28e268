//! Presentation layer for ragchat
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::{Cli, Command, DocsCommand, SearchArgs};
pub use output::console::ConsoleFormatter;
pub use output::renderer::ConsoleRenderer;
pub use output::stream::{StreamPrinter, StreamUpdate};
pub use progress::ProgressReporter;
