//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for ragchat
#[derive(Parser, Debug)]
#[command(name = "ragchat")]
#[command(author, version, about = "Chat with a local model, grounded in your documents")]
#[command(long_about = r#"
ragchat talks to a local Ollama server. In RAG mode (the default) every
question is embedded, the closest documents are fetched from the vector
store and handed to the model as context.

Configuration is merged from (highest priority first):
1. Command line flags
2. RAGCHAT_* environment variables (e.g. RAGCHAT_OLLAMA__MODEL=mistral)
3. --config <path>     Explicit config file
4. ./ragchat.toml      Project-level config
5. ~/.config/ragchat/config.toml   Global config

Example:
  ragchat
  ragchat --no-rag --model mistral
  ragchat ask "Why is the sky blue?"
  ragchat search "ownership rules" -n 3
  ragchat docs add "Rust 1.0 was released in May 2015." --metadata '{"source":"notes"}'
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Start chat with retrieval enabled
    #[arg(long, conflicts_with = "no_rag", global = true)]
    pub rag: bool,

    /// Start chat with retrieval disabled
    #[arg(long, global = true)]
    pub no_rag: bool,

    /// Model used for generation
    #[arg(short, long, value_name = "MODEL", global = true)]
    pub model: Option<String>,

    /// Base URL of the Ollama server
    #[arg(long, value_name = "URL", global = true)]
    pub ollama_url: Option<String>,

    /// Base URL of the vector store service
    #[arg(long, value_name = "URL", global = true)]
    pub vector_store_url: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Mode requested on the command line, if any.
    pub fn rag_flag(&self) -> Option<bool> {
        match (self.rag, self.no_rag) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// The subcommand to run; chat when none was given.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat (default)
    Chat,

    /// Send a prompt to the model verbatim and stream the answer
    Ask {
        /// Prompt text, sent without template or retrieval
        prompt: String,
    },

    /// Show the documents closest to a query
    Search(SearchArgs),

    /// Inspect and manage the document collection
    #[command(subcommand)]
    Docs(DocsCommand),

    /// Check the vector store service
    Health,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
    /// Text to search for
    pub query: String,

    /// Number of results (defaults to vector_store.search_results)
    #[arg(short = 'n', long = "results", value_name = "N")]
    pub n_results: Option<usize>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DocsCommand {
    /// Show collection name and size
    Info,

    /// List stored documents
    List {
        /// Only show documents whose id or content contains TEXT
        #[arg(short, long, value_name = "TEXT")]
        filter: Option<String>,
    },

    /// Add a document
    Add {
        /// Document text
        content: String,

        /// Metadata as a JSON object
        #[arg(long, value_name = "JSON")]
        metadata: Option<String>,
    },

    /// Delete documents by id
    Delete {
        /// Ids of the documents to delete
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete every document
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["ragchat"]).unwrap();
        assert_eq!(cli.resolved_command(), Command::Chat);
        assert_eq!(cli.rag_flag(), None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ragchat", "chat", "--no-rag", "-m", "mistral", "-vv"]).unwrap();
        assert_eq!(cli.rag_flag(), Some(false));
        assert_eq!(cli.model.as_deref(), Some("mistral"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rag_flags_conflict() {
        assert!(Cli::try_parse_from(["ragchat", "--rag", "--no-rag"]).is_err());
    }

    #[test]
    fn test_search_count() {
        let cli = Cli::try_parse_from(["ragchat", "search", "borrow checker", "-n", "2"]).unwrap();
        assert_eq!(
            cli.resolved_command(),
            Command::Search(SearchArgs {
                query: "borrow checker".to_string(),
                n_results: Some(2),
            })
        );
    }

    #[test]
    fn test_docs_subcommands() {
        let cli = Cli::try_parse_from([
            "ragchat",
            "docs",
            "add",
            "some text",
            "--metadata",
            "{\"a\":1}",
        ])
        .unwrap();
        assert_eq!(
            cli.resolved_command(),
            Command::Docs(DocsCommand::Add {
                content: "some text".to_string(),
                metadata: Some("{\"a\":1}".to_string()),
            })
        );

        let cli = Cli::try_parse_from(["ragchat", "docs", "delete", "a", "b"]).unwrap();
        assert_eq!(
            cli.resolved_command(),
            Command::Docs(DocsCommand::Delete {
                ids: vec!["a".to_string(), "b".to_string()],
            })
        );

        assert!(Cli::try_parse_from(["ragchat", "docs", "delete"]).is_err());
    }
}
