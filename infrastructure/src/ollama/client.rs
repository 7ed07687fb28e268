//! HTTP client for the Ollama API (`/api/generate`, `/api/embeddings`).

use crate::config::{DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, FileOllamaConfig};
use crate::http::{endpoint, ensure_success, read_json, transport_error};
use async_trait::async_trait;
use futures::StreamExt;
use ragchat_application::{ByteStream, EmbeddingPort, GenerationPort, ServiceError};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Serialize)]
struct ModelRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f64>,
}

/// Client for one Ollama server.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    embedding_model: String,
}

impl OllamaClient {
    /// Client for the server at `base_url`, e.g. `http://localhost:11434`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn from_config(config: &FileOllamaConfig) -> Self {
        Self::new(&config.base_url)
            .with_model(&config.model)
            .with_embedding_model(&config.embedding_model)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingPort for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, ServiceError> {
        let url = endpoint(&self.base_url, "/api/embeddings");
        trace!(%url, model = %self.embedding_model, "Ollama embedding request");

        let response = self
            .http
            .post(url)
            .json(&ModelRequest {
                model: &self.embedding_model,
                prompt: text,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let body: EmbeddingResponse = read_json(response).await?;
        debug!("Received embedding with {} dimensions", body.embedding.len());
        Ok(body.embedding)
    }
}

#[async_trait]
impl GenerationPort for OllamaClient {
    async fn open_stream(&self, prompt: &str) -> Result<ByteStream, ServiceError> {
        let url = endpoint(&self.base_url, "/api/generate");
        trace!(%url, model = %self.model, "Ollama generate request");

        let response = self
            .http
            .post(url)
            .json(&ModelRequest {
                model: &self.model,
                prompt,
            })
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        debug!("Ollama stream opened ({})", response.status());

        Ok(response
            .bytes_stream()
            .map(|delivery| delivery.map(|bytes| bytes.to_vec()).map_err(transport_error))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use ragchat_application::GenerationClient;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_embed_posts_model_and_prompt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/embeddings")
                    .json_body(json!({"model": "nomic-embed-text", "prompt": "hello"}));
                then.status(200)
                    .json_body(json!({"embedding": [0.25, -1.0, 3.5]}));
            })
            .await;

        let client = OllamaClient::new(server.base_url());
        let vector = client.embed("hello").await.unwrap();

        assert_eq!(vector, vec![0.25, -1.0, 3.5]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_embed_keeps_full_precision() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/embeddings");
                then.status(200)
                    .json_body(json!({"embedding": [0.123456789012345, -9.87654321e-12]}));
            })
            .await;

        let vector = OllamaClient::new(server.base_url())
            .embed("hello")
            .await
            .unwrap();
        assert_eq!(vector, vec![0.123456789012345, -9.87654321e-12]);
    }

    #[tokio::test]
    async fn test_embed_non_success_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/embeddings");
                then.status(500).body("model not loaded");
            })
            .await;

        let err = OllamaClient::new(server.base_url())
            .embed("hello")
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::status(500, "model not loaded"));
    }

    #[tokio::test]
    async fn test_embed_unexpected_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/embeddings");
                then.status(200).json_body(json!({"vectors": []}));
            })
            .await;

        let err = OllamaClient::new(server.base_url())
            .embed("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_streams_ndjson() {
        let server = MockServer::start_async().await;
        let body = concat!(
            "{\"model\":\"mistral\",\"response\":\"Hel\",\"done\":false}\n",
            "{\"model\":\"mistral\",\"response\":\"lo\",\"done\":false}\n",
            "{\"model\":\"mistral\",\"response\":\"\",\"done\":true}\n",
        );
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body(json!({"model": "mistral", "prompt": "Say hello"}));
                then.status(200)
                    .header("content-type", "application/x-ndjson")
                    .body(body);
            })
            .await;

        let client = GenerationClient::new(Arc::new(
            OllamaClient::new(server.base_url()).with_model("mistral"),
        ));
        let mut seen = Vec::new();
        let result = client
            .generate("Say hello", |text| seen.push(text.to_string()))
            .await;

        assert!(result.is_success());
        assert_eq!(result.text, "Hello");
        assert_eq!(seen.last().map(String::as_str), Some("Hello"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_rejected_before_streaming() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(404)
                    .body("{\"error\":\"model 'nope' not found\"}");
            })
            .await;

        let result = OllamaClient::new(server.base_url())
            .with_model("nope")
            .open_stream("hi")
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is not expected to run an HTTP server.
        let err = OllamaClient::new("http://127.0.0.1:9")
            .embed("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }
}
