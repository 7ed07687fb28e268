//! Turning vector-store matches into the context block of a RAG prompt.

/// Number of documents requested per retrieval.
pub const DEFAULT_N_RESULTS: usize = 3;

/// Header placed before the retrieved documents.
pub const CONTEXT_HEADER: &str = "\n\nRelevant context:\n";

/// Separator between retrieved documents.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Format retrieved documents as prompt context.
///
/// No documents is a valid outcome and yields the empty string, so the model
/// answers from its own knowledge.
pub fn format_context<S: AsRef<str>>(documents: &[S]) -> String {
    if documents.is_empty() {
        return String::new();
    }
    let joined = documents
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR);
    format!("{CONTEXT_HEADER}{joined}")
}
