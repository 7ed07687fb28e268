//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use colored::Colorize;
use ragchat_application::ResponseOrchestrator;
use ragchat_domain::ChatMode;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Clear,
    History,
    /// Show the current mode
    ShowMode,
    SetMode(ChatMode),
    Unknown(String),
    Usage(&'static str),
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match name {
            "/quit" | "/exit" | "/q" => Self::Quit,
            "/help" | "/h" | "/?" => Self::Help,
            "/clear" => Self::Clear,
            "/history" => Self::History,
            "/rag" => match arg.map(str::to_lowercase).as_deref() {
                None => Self::ShowMode,
                Some("on") => Self::SetMode(ChatMode::Rag),
                Some("off") => Self::SetMode(ChatMode::Plain),
                Some(_) => Self::Usage("/rag [on|off]"),
            },
            "/mode" => match arg {
                None => Self::ShowMode,
                Some(value) => match value.parse::<ChatMode>() {
                    Ok(mode) => Self::SetMode(mode),
                    Err(_) => Self::Usage("/mode [rag|plain]"),
                },
            },
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    orchestrator: Arc<ResponseOrchestrator>,
    model: String,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(orchestrator: Arc<ResponseOrchestrator>, model: impl Into<String>) -> Self {
        Self {
            orchestrator,
            model: model.into(),
            history_path: None,
        }
    }

    /// Set where line history is persisted
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)) {
                            break;
                        }
                        continue;
                    }

                    println!();
                    self.orchestrator.submit(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              ragchat - Chat Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.model.bold());
        println!(
            "Mode:  {}",
            ConsoleFormatter::format_mode(self.orchestrator.session().mode())
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /rag [on|off]      - Show or switch retrieval");
        println!("  /mode [rag|plain]  - Show or switch the chat mode");
        println!("  /clear             - Start a new conversation");
        println!("  /history           - Show the conversation so far");
        println!("  /help, /h, /?      - Show this help");
        println!("  /quit, /exit, /q   - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&self, command: ReplCommand) -> bool {
        let session = self.orchestrator.session();
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
            }
            ReplCommand::Clear => {
                self.orchestrator.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            ReplCommand::History => {
                println!();
                print!("{}", ConsoleFormatter::format_history(&session.messages()));
                println!();
            }
            ReplCommand::ShowMode => {
                println!("Mode: {}", ConsoleFormatter::format_mode(session.mode()));
            }
            ReplCommand::SetMode(mode) => {
                session.set_mode(mode);
                println!("Mode: {}", ConsoleFormatter::format_mode(mode));
            }
            ReplCommand::Usage(usage) => {
                println!("Usage: {}", usage);
            }
            ReplCommand::Unknown(name) => {
                println!("Unknown command: {}", name);
                println!("Type /help for available commands");
            }
        }
        false
    }
}
