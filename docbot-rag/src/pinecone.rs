//! Pinecone vector store backend over the Pinecone HTTP API.
//!
//! [`PineconeVectorStore`] implements [`VectorStore`] against a Pinecone
//! serverless index: index creation and readiness polling go through the
//! control plane (`api.pinecone.io`), upserts and queries through the
//! index's own data-plane host, which is resolved lazily and cached.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::{Duration, sleep};
use tracing::{debug, info};

use async_trait::async_trait;

use crate::document::{IndexEntry, ScoredChunk};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Base URL for the Pinecone control plane.
const PINECONE_API_BASE: &str = "https://api.pinecone.io";

/// Pinecone recommends upsert batches of at most 100 vectors.
const UPSERT_BATCH_SIZE: usize = 100;

/// Delay between readiness polls after index creation.
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Environment variable holding the Pinecone API key.
const PINECONE_API_KEY_VAR: &str = "PINECONE_API_KEY";

/// A [`VectorStore`] backed by a Pinecone serverless index.
///
/// Holds one document's chunks at a time: [`replace_all`](VectorStore::replace_all)
/// wipes the index before upserting, so the store is single-writer,
/// single-document by design.
pub struct PineconeVectorStore {
    client: reqwest::Client,
    api_key: String,
    index_name: String,
    cloud: String,
    region: String,
    /// Data-plane host for the index, resolved on first use.
    host: RwLock<Option<String>>,
}

impl PineconeVectorStore {
    /// Create a new store for the named index with the given API key.
    ///
    /// Defaults to the `aws` / `us-east-1` serverless spec.
    pub fn new(api_key: impl Into<String>, index_name: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Self::store_error("API key must not be empty"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            index_name: index_name.into(),
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            host: RwLock::new(None),
        })
    }

    /// Create a new store using the `PINECONE_API_KEY` environment variable.
    pub fn from_env(index_name: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var(PINECONE_API_KEY_VAR).map_err(|_| {
            Self::store_error(format!("{PINECONE_API_KEY_VAR} environment variable not set"))
        })?;
        Self::new(api_key, index_name)
    }

    /// Set the serverless cloud and region for index creation.
    pub fn with_region(mut self, cloud: impl Into<String>, region: impl Into<String>) -> Self {
        self.cloud = cloud.into();
        self.region = region.into();
        self
    }

    fn store_error(message: impl Into<String>) -> RagError {
        RagError::VectorStoreError { backend: "pinecone".to_string(), message: message.into() }
    }

    fn map_request_err(e: reqwest::Error) -> RagError {
        Self::store_error(format!("request failed: {e}"))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Self::store_error(format!("API returned {status}: {body}")))
    }

    /// Describe the index; `Ok(None)` if it does not exist.
    async fn describe_index(&self) -> Result<Option<DescribeIndexResponse>> {
        let response = self
            .client
            .get(format!("{PINECONE_API_BASE}/indexes/{}", self.index_name))
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(Self::map_request_err)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let described: DescribeIndexResponse = response
            .json()
            .await
            .map_err(|e| Self::store_error(format!("failed to parse describe response: {e}")))?;
        Ok(Some(described))
    }

    /// Resolve (and cache) the index's data-plane host.
    ///
    /// `Ok(None)` means the index has never been created.
    async fn resolve_host(&self) -> Result<Option<String>> {
        if let Some(host) = self.host.read().await.clone() {
            return Ok(Some(host));
        }

        let Some(described) = self.describe_index().await? else {
            return Ok(None);
        };

        let mut cached = self.host.write().await;
        *cached = Some(described.host.clone());
        Ok(Some(described.host))
    }

    async fn require_host(&self) -> Result<String> {
        self.resolve_host().await?.ok_or_else(|| {
            Self::store_error(format!(
                "index '{}' does not exist; call ensure_index first",
                self.index_name
            ))
        })
    }
}

// ── Pinecone API request/response types ────────────────────────────

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
    dimension: usize,
    status: IndexStatus,
}

#[derive(Deserialize)]
struct IndexStatus {
    ready: bool,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [UpsertVector],
}

#[derive(Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: EntryMetadata,
}

#[derive(Serialize, Deserialize)]
struct EntryMetadata {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAllRequest {
    delete_all: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    metadata: Option<EntryMetadata>,
}

// ── VectorStore implementation ─────────────────────────────────────

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn ensure_index(&self, dimensions: usize) -> Result<()> {
        if let Some(described) = self.describe_index().await? {
            if described.dimension != dimensions {
                return Err(Self::store_error(format!(
                    "index '{}' exists with dimension {}, expected {}",
                    self.index_name, described.dimension, dimensions
                )));
            }
            debug!(index = %self.index_name, "pinecone index already exists");
        } else {
            info!(index = %self.index_name, dimensions, "creating pinecone index");
            let request_body = CreateIndexRequest {
                name: &self.index_name,
                dimension: dimensions,
                metric: "cosine",
                spec: IndexSpec {
                    serverless: ServerlessSpec { cloud: &self.cloud, region: &self.region },
                },
            };

            let response = self
                .client
                .post(format!("{PINECONE_API_BASE}/indexes"))
                .header("Api-Key", &self.api_key)
                .json(&request_body)
                .send()
                .await
                .map_err(Self::map_request_err)?;
            Self::check_status(response).await?;
        }

        // Creation is asynchronous on Pinecone's side; poll until ready.
        loop {
            let described = self
                .describe_index()
                .await?
                .ok_or_else(|| Self::store_error("index disappeared during readiness poll"))?;
            if described.status.ready {
                let mut cached = self.host.write().await;
                *cached = Some(described.host);
                break;
            }
            debug!(index = %self.index_name, "waiting for pinecone index to be ready");
            sleep(READY_POLL_INTERVAL).await;
        }

        Ok(())
    }

    async fn replace_all(&self, entries: &[IndexEntry]) -> Result<()> {
        let host = self.require_host().await?;

        // Clear the previous document's entries. Pinecone returns 404 for
        // a delete-all against an index with no namespace yet; that just
        // means there is nothing to clear.
        let response = self
            .client
            .post(format!("https://{host}/vectors/delete"))
            .header("Api-Key", &self.api_key)
            .json(&DeleteAllRequest { delete_all: true })
            .send()
            .await
            .map_err(Self::map_request_err)?;
        if response.status() != reqwest::StatusCode::NOT_FOUND {
            Self::check_status(response).await?;
        }

        let vectors: Vec<UpsertVector> = entries
            .iter()
            .map(|entry| UpsertVector {
                id: entry.id.clone(),
                values: entry.embedding.clone(),
                metadata: EntryMetadata { text: entry.text.clone() },
            })
            .collect();

        for batch in vectors.chunks(UPSERT_BATCH_SIZE) {
            let response = self
                .client
                .post(format!("https://{host}/vectors/upsert"))
                .header("Api-Key", &self.api_key)
                .json(&UpsertRequest { vectors: batch })
                .send()
                .await
                .map_err(Self::map_request_err)?;
            Self::check_status(response).await?;
        }

        info!(index = %self.index_name, count = entries.len(), "replaced pinecone index contents");
        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        // No index yet means no document has been ingested: nothing to
        // retrieve, not an error.
        let Some(host) = self.resolve_host().await? else {
            debug!(index = %self.index_name, "pinecone index does not exist, returning empty");
            return Ok(Vec::new());
        };

        let request_body = QueryRequest { vector: embedding, top_k, include_metadata: true };

        let response = self
            .client
            .post(format!("https://{host}/query"))
            .header("Api-Key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(Self::map_request_err)?;
        let response = Self::check_status(response).await?;

        let query_response: QueryResponse = response
            .json()
            .await
            .map_err(|e| Self::store_error(format!("failed to parse query response: {e}")))?;

        Ok(query_response
            .matches
            .into_iter()
            .map(|m| ScoredChunk {
                id: m.id,
                text: m.metadata.map(|meta| meta.text).unwrap_or_default(),
                score: m.score,
            })
            .collect())
    }
}
