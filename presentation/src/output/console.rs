//! Console output formatter for command results

use colored::Colorize;
use ragchat_domain::util::preview;
use ragchat_domain::{
    ChatMode, CollectionInfo, Message, Metadata, Participant, StoreHealth, StoredDocument,
};

/// Longest document excerpt shown in listings and search results.
const EXCERPT_CHARS: usize = 200;

/// Formats command results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the collection summary from `docs info`
    pub fn format_collection_info(info: &CollectionInfo) -> String {
        let mut output = Self::header("Collection");
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Name:".cyan().bold(), info.name));
        output.push_str(&format!("{} {}\n", "Documents:".cyan().bold(), info.count));
        if !info.metadata.is_empty() {
            output.push_str(&format!(
                "{}\n{}\n",
                "Metadata:".cyan().bold(),
                Self::indent(&Self::pretty_json(&info.metadata), "  ")
            ));
        }
        output
    }

    /// Format a document listing, optionally filtered by id or content
    pub fn format_documents(documents: &[StoredDocument], filter: Option<&str>) -> String {
        let shown: Vec<&StoredDocument> = documents
            .iter()
            .filter(|doc| filter.is_none_or(|f| doc.matches(f)))
            .collect();

        let title = match filter {
            Some(f) => format!("Documents matching '{}' ({} of {})", f, shown.len(), documents.len()),
            None => format!("Documents ({})", documents.len()),
        };
        let mut output = Self::section_header(&title);

        if shown.is_empty() {
            output.push_str(&format!("{}\n", "No documents found.".dimmed()));
            return output;
        }

        for doc in shown {
            output.push_str(&format!("\n{}\n", doc.id.yellow().bold()));
            output.push_str(&Self::indent(&preview(&doc.content, EXCERPT_CHARS), "  "));
            output.push('\n');
            if !doc.metadata.is_empty() {
                output.push_str(&format!(
                    "  {}\n",
                    format!("{} metadata fields", doc.metadata.len()).dimmed()
                ));
                output.push_str(&Self::indent(&Self::pretty_json(&doc.metadata), "    "));
                output.push('\n');
            }
        }
        output
    }

    /// Format the matches returned by `search`
    pub fn format_search_results(query: &str, documents: &[String]) -> String {
        let mut output = format!("{} {}\n", "Query:".cyan().bold(), query);

        if documents.is_empty() {
            output.push_str(&format!("{}\n", "No matching documents.".dimmed()));
            return output;
        }

        for (rank, doc) in documents.iter().enumerate() {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── #{} ──", rank + 1).yellow().bold(),
                Self::indent(&preview(doc, EXCERPT_CHARS), "  ")
            ));
        }
        output
    }

    /// Format the vector store health report
    pub fn format_health(health: &StoreHealth) -> String {
        let status = if health.is_healthy() {
            health.status.green().bold()
        } else {
            health.status.red().bold()
        };
        let mut output = format!("{} {}\n", "Vector store:".cyan().bold(), status);

        if let Some(name) = &health.collection_name {
            output.push_str(&format!("  collection: {}\n", name));
        }
        if let Some(count) = health.document_count {
            output.push_str(&format!("  documents:  {}\n", count));
        }
        if let Some(available) = health.ollama_available {
            output.push_str(&format!(
                "  ollama:     {}\n",
                if available { "available" } else { "unavailable" }
            ));
        }
        if let Some(error) = &health.error {
            output.push_str(&format!("  {} {}\n", "error:".red(), error));
        }
        output
    }

    /// Format the conversation so far (`/history`)
    pub fn format_history(messages: &[Message]) -> String {
        if messages.is_empty() {
            return format!("{}\n", "No messages yet.".dimmed());
        }
        messages
            .iter()
            .map(|message| {
                format!(
                    "{} {}\n",
                    Self::speaker(message.sender),
                    if message.text.is_empty() {
                        "…".dimmed().to_string()
                    } else {
                        message.text.clone()
                    }
                )
            })
            .collect()
    }

    /// Label shown before a message
    pub fn speaker(sender: Participant) -> String {
        let label = format!("{}:", sender);
        match sender {
            Participant::User => label.green().bold().to_string(),
            Participant::Assistant => label.blue().bold().to_string(),
        }
    }

    /// Describe a chat mode for status lines
    pub fn format_mode(mode: ChatMode) -> String {
        match mode {
            ChatMode::Rag => format!("{} (answers use retrieved documents)", "rag".green().bold()),
            ChatMode::Plain => format!("{} (model only, no retrieval)", "plain".yellow().bold()),
        }
    }

    fn pretty_json(value: &Metadata) -> String {
        serde_json::to_string_pretty(value).unwrap_or_default()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
