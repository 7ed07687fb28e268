//! HTTP client for the vector store service.

use crate::config::FileVectorStoreConfig;
use crate::http::{endpoint, read_json, transport_error};
use async_trait::async_trait;
use ragchat_application::{DocumentStorePort, ServiceError, VectorStorePort};
use ragchat_domain::{CollectionInfo, Metadata, StoreHealth, StoredDocument};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f64],
    n_results: usize,
}

/// Raw query result: one list of documents per query vector.
#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
}

impl QueryResponse {
    fn into_documents(self) -> Vec<String> {
        self.documents
            .unwrap_or_default()
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect()
    }
}

#[derive(Deserialize)]
struct DocumentsResponse {
    documents: Vec<StoredDocument>,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    content: &'a str,
    metadata: &'a Metadata,
}

#[derive(Deserialize)]
struct AddResponse {
    success: bool,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    ids: &'a [String],
}

#[derive(Deserialize)]
struct DeleteResponse {
    success: bool,
    #[serde(default)]
    deleted_count: usize,
}

#[derive(Deserialize)]
struct ClearResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

/// Client for the vector store service.
#[derive(Clone, Debug)]
pub struct VectorStoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl VectorStoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &FileVectorStoreConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ServiceError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let url = endpoint(&self.base_url, path);
        trace!(%method, %url, "Vector store request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(transport_error)?;
        read_json(response).await
    }

    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T, ServiceError> {
        self.send::<(), T>(Method::GET, path, None).await
    }
}

fn rejected(operation: &str) -> ServiceError {
    ServiceError::InvalidResponse(format!("{operation} reported success=false"))
}

#[async_trait]
impl VectorStorePort for VectorStoreClient {
    async fn query(&self, vector: &[f64], n_results: usize) -> Result<Vec<String>, ServiceError> {
        let response: QueryResponse = self
            .send(
                Method::POST,
                "/query_vector",
                Some(&QueryRequest { vector, n_results }),
            )
            .await?;
        let documents = response.into_documents();
        debug!("Vector store returned {} documents", documents.len());
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStorePort for VectorStoreClient {
    async fn info(&self) -> Result<CollectionInfo, ServiceError> {
        self.get("/collection/info").await
    }

    async fn list(&self) -> Result<Vec<StoredDocument>, ServiceError> {
        let response: DocumentsResponse = self.get("/collection/documents").await?;
        Ok(response.documents)
    }

    async fn add(&self, content: &str, metadata: Metadata) -> Result<String, ServiceError> {
        let response: AddResponse = self
            .send(
                Method::POST,
                "/collection/add",
                Some(&AddRequest {
                    content,
                    metadata: &metadata,
                }),
            )
            .await?;
        match response {
            AddResponse {
                success: true,
                id: Some(id),
            } => Ok(id),
            _ => Err(rejected("add")),
        }
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, ServiceError> {
        let response: DeleteResponse = self
            .send(
                Method::DELETE,
                "/collection/delete",
                Some(&DeleteRequest { ids }),
            )
            .await?;
        if !response.success {
            return Err(rejected("delete"));
        }
        Ok(response.deleted_count)
    }

    async fn clear(&self) -> Result<String, ServiceError> {
        let response: ClearResponse = self
            .send::<(), _>(Method::DELETE, "/collection/clear", None)
            .await?;
        if !response.success {
            return Err(rejected("clear"));
        }
        Ok(response.message)
    }

    async fn health(&self) -> Result<StoreHealth, ServiceError> {
        self.get("/health").await
    }
}
