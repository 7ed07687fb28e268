//! Scripted port implementations shared by the use case tests.

use crate::ports::embedding::EmbeddingPort;
use crate::ports::generation::{ByteStream, GenerationPort};
use crate::ports::service_error::ServiceError;
use crate::ports::template_store::{TemplateError, TemplateStore};
use crate::ports::vector_store::VectorStorePort;
use async_trait::async_trait;
use futures::StreamExt;
use ragchat_domain::TemplateName;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

// ==================== Embedding ====================

pub struct ScriptedEmbedding {
    result: Result<Vec<f64>, ServiceError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEmbedding {
    pub fn ok(vector: Vec<f64>) -> Self {
        Self {
            result: Ok(vector),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            result: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingPort for ScriptedEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, ServiceError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.result.clone()
    }
}

// ==================== Vector store ====================

pub struct ScriptedVectorStore {
    result: Result<Vec<String>, ServiceError>,
    calls: Mutex<Vec<(Vec<f64>, usize)>>,
}

impl ScriptedVectorStore {
    pub fn ok<S: Into<String>>(documents: Vec<S>) -> Self {
        Self {
            result: Ok(documents.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            result: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<f64>, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStorePort for ScriptedVectorStore {
    async fn query(&self, vector: &[f64], n_results: usize) -> Result<Vec<String>, ServiceError> {
        self.calls.lock().unwrap().push((vector.to_vec(), n_results));
        self.result.clone()
    }
}

// ==================== Templates ====================

#[derive(Default)]
pub struct StaticTemplates {
    templates: HashMap<TemplateName, String>,
}

impl StaticTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: TemplateName, text: &str) -> Self {
        self.templates.insert(name, text.to_string());
        self
    }
}

#[async_trait]
impl TemplateStore for StaticTemplates {
    async fn load(&self, name: TemplateName) -> Result<String, TemplateError> {
        self.templates
            .get(&name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.as_str().to_string()))
    }
}

// ==================== Generation ====================

/// What one `open_stream` call produces.
pub enum StreamScript {
    /// Stream these deliveries, then end.
    Deliveries(Vec<Result<Vec<u8>, ServiceError>>),
    /// Fail to open.
    Refuse(ServiceError),
    /// Wait for the signal, then stream the deliveries.
    Gated(oneshot::Receiver<()>, Vec<Result<Vec<u8>, ServiceError>>),
}

impl StreamScript {
    pub fn deliveries(chunks: Vec<&str>) -> Self {
        Self::Deliveries(chunks.into_iter().map(|c| Ok(c.as_bytes().to_vec())).collect())
    }

    /// A stream that answers `text` as a single record.
    pub fn answer(text: &str) -> Self {
        Self::Deliveries(vec![Ok(response_line(text))])
    }

    /// A stream that answers `text` once `gate` fires.
    pub fn gated(gate: oneshot::Receiver<()>, text: &str) -> Self {
        Self::Gated(gate, vec![Ok(response_line(text))])
    }
}

pub fn response_line(text: &str) -> Vec<u8> {
    let mut line = serde_json::to_vec(&serde_json::json!({ "response": text })).unwrap();
    line.push(b'\n');
    line
}

pub struct ScriptedGeneration {
    scripts: Mutex<VecDeque<StreamScript>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGeneration {
    pub fn new(scripts: Vec<StreamScript>) -> Self {
        Self {
            scripts: Mutex::new(VecDeque::from(scripts)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationPort for ScriptedGeneration {
    async fn open_stream(&self, prompt: &str) -> Result<ByteStream, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ServiceError::Transport("No more scripted streams".to_string()))?;

        match script {
            StreamScript::Deliveries(items) => Ok(futures::stream::iter(items).boxed()),
            StreamScript::Refuse(error) => Err(error),
            StreamScript::Gated(gate, items) => {
                let _ = gate.await;
                Ok(futures::stream::iter(items).boxed())
            }
        }
    }
}
