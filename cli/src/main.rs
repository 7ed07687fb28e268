//! CLI entrypoint for ragchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use ragchat_application::{
    ConversationSession, DocumentStorePort, GenerationClient, PromptBuilder, ResponseOrchestrator,
    RetrievalPipeline,
};
use ragchat_domain::Metadata;
use ragchat_infrastructure::{
    ConfigLoader, ConfigOverrides, FileConfig, FileTemplateStore, JsonlConversationLogger,
    OllamaClient, VectorStoreClient,
    config::{ChatOverrides, OllamaOverrides, VectorStoreOverrides},
};
use ragchat_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, ConsoleRenderer, DocsCommand, ProgressReporter,
    StreamPrinter, StreamUpdate,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    info!("Starting ragchat");

    // === Dependency Injection ===
    let ollama = Arc::new(OllamaClient::from_config(&config.ollama));
    let vector_store = Arc::new(VectorStoreClient::from_config(&config.vector_store));
    let settings = config.chat_settings();

    let retrieval = RetrievalPipeline::new(ollama.clone(), vector_store.clone())
        .with_n_results(settings.n_results);

    match cli.resolved_command() {
        Command::Chat => {
            let show_progress = config.repl.show_progress && !cli.quiet;
            let session = ConversationSession::new(settings.mode)
                .with_observer(Arc::new(ConsoleRenderer::new(show_progress)));
            let prompt_builder = PromptBuilder::new(
                Arc::new(FileTemplateStore::new(config.templates_dir())),
                retrieval,
            );

            let mut orchestrator =
                ResponseOrchestrator::new(session, prompt_builder, GenerationClient::new(ollama.clone()));
            if let Some(path) = config.conversation_log_path() {
                match JsonlConversationLogger::open(&path) {
                    Some(logger) => {
                        info!("Conversation log: {}", path.display());
                        orchestrator = orchestrator.with_conversation_logger(Arc::new(logger));
                    }
                    None => warn!("Conversation logging disabled"),
                }
            }

            ChatRepl::new(Arc::new(orchestrator), ollama.model())
                .with_history_file(config.repl.history_path())
                .run()
                .await?;
        }
        Command::Ask { prompt } => ask(GenerationClient::new(ollama), &prompt, cli.quiet).await?,
        Command::Search(args) => {
            let n_results = args.n_results.unwrap_or(settings.search_results);
            let progress = progress(cli.quiet);
            progress.start("Searching documents...");
            let result = retrieval.search(&args.query, n_results).await;
            progress.stop();
            println!(
                "{}",
                ConsoleFormatter::format_search_results(&args.query, &result?)
            );
        }
        Command::Docs(command) => docs(vector_store.as_ref(), command).await?,
        Command::Health => {
            let health = vector_store
                .health()
                .await
                .context("Vector store is unreachable")?;
            print!("{}", ConsoleFormatter::format_health(&health));
            if !health.is_healthy() {
                bail!("Vector store reported status '{}'", health.status);
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let overrides = ConfigOverrides {
        ollama: OllamaOverrides {
            base_url: cli.ollama_url.clone(),
            model: cli.model.clone(),
        },
        vector_store: VectorStoreOverrides {
            base_url: cli.vector_store_url.clone(),
        },
        chat: ChatOverrides {
            rag: cli.rag_flag(),
        },
    };

    let config = if cli.no_config {
        ConfigLoader::load_without_files(&overrides)?
    } else {
        ConfigLoader::load(cli.config.as_ref(), &overrides)?
    };
    Ok(config)
}

fn progress(quiet: bool) -> ProgressReporter {
    if quiet {
        ProgressReporter::hidden()
    } else {
        ProgressReporter::new()
    }
}

/// Stream a single prompt's answer to stdout.
async fn ask(generation: GenerationClient, prompt: &str, quiet: bool) -> Result<()> {
    let progress = progress(quiet);
    progress.start("Thinking...");

    let mut printer = StreamPrinter::new();
    let mut stdout = io::stdout();
    let result = generation
        .generate(prompt, |text| {
            progress.stop();
            if let StreamUpdate::Append(delta) | StreamUpdate::Replace(delta) = printer.advance(text)
            {
                let _ = write!(stdout, "{}", delta);
                let _ = stdout.flush();
            }
        })
        .await;
    progress.stop();
    println!();

    if let Some(error) = result.error {
        bail!("Generation failed: {}", error);
    }
    Ok(())
}

async fn docs(store: &dyn DocumentStorePort, command: DocsCommand) -> Result<()> {
    match command {
        DocsCommand::Info => {
            let info = store.info().await?;
            print!("{}", ConsoleFormatter::format_collection_info(&info));
        }
        DocsCommand::List { filter } => {
            let documents = store.list().await?;
            print!(
                "{}",
                ConsoleFormatter::format_documents(&documents, filter.as_deref())
            );
        }
        DocsCommand::Add { content, metadata } => {
            let metadata = match metadata {
                Some(raw) => parse_metadata(&raw)?,
                None => Metadata::new(),
            };
            let id = store.add(&content, metadata).await?;
            println!("Added document {}", id);
        }
        DocsCommand::Delete { ids } => {
            let deleted = store.delete(&ids).await?;
            println!("Deleted {} of {} document(s)", deleted, ids.len());
        }
        DocsCommand::Clear { yes } => {
            if !yes && !confirm("Delete every document in the collection?")? {
                println!("Aborted.");
                return Ok(());
            }
            let message = store.clear().await?;
            println!("{}", message);
        }
    }
    Ok(())
}

fn parse_metadata(raw: &str) -> Result<Metadata> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("--metadata is not valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => bail!("--metadata must be a JSON object, got {}", other),
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
