//! Ollama model server adapter.
//!
//! [`OllamaClient`] implements both the embedding and the generation ports
//! against a single Ollama instance.

mod client;

pub use client::OllamaClient;
