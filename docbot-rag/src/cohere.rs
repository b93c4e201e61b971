//! Cohere embedding and rerank providers over the Cohere v1 HTTP API.
//!
//! Uses `reqwest` to call `/v1/embed` and `/v1/rerank` directly. API keys
//! come from the constructor or the `COHERE_API_KEY` environment variable,
//! never from source literals.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::embedding::{EmbeddingProvider, InputType};
use crate::error::{RagError, Result};
use crate::reranker::{RankedDocument, Reranker};

/// Base URL for the Cohere v1 API.
const COHERE_API_BASE: &str = "https://api.cohere.com/v1";

/// The default Cohere embedding model.
const DEFAULT_EMBED_MODEL: &str = "embed-english-v3.0";

/// The default Cohere rerank model.
const DEFAULT_RERANK_MODEL: &str = "rerank-english-v3.0";

/// Fallback dimensionality for `embed-english-v3.0` when the startup
/// probe fails.
const DEFAULT_DIMENSIONS: usize = 1024;

/// Fixed probe string used to discover the embedding dimension at startup.
const DIMENSION_PROBE_TEXT: &str = "hello world";

/// Environment variable holding the Cohere API key.
const COHERE_API_KEY_VAR: &str = "COHERE_API_KEY";

/// Read the API error detail from a response body, falling back to the
/// raw body when it is not the expected JSON shape.
fn error_detail(body: String) -> String {
    #[derive(Deserialize)]
    struct ErrorResponse {
        message: String,
    }
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.message).unwrap_or(body)
}

fn api_key_from_env(provider: &str) -> Result<String> {
    std::env::var(COHERE_API_KEY_VAR).map_err(|_| RagError::EmbeddingError {
        provider: provider.into(),
        message: format!("{COHERE_API_KEY_VAR} environment variable not set"),
    })
}

// ── Embedding provider ─────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by the Cohere `/v1/embed` endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use docbot_rag::cohere::CohereEmbeddingProvider;
///
/// let provider = CohereEmbeddingProvider::from_env()?.probe_dimensions().await;
/// let vectors = provider.embed(&["hello"], InputType::SearchQuery).await?;
/// ```
pub struct CohereEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl CohereEmbeddingProvider {
    /// Create a new provider with the given API key and the default
    /// model (`embed-english-v3.0`) and dimensions (1024).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::EmbeddingError {
                provider: "Cohere".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_EMBED_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Create a new provider using the `COHERE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::new(api_key_from_env("Cohere")?)
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Discover the model's output dimension by embedding a fixed probe
    /// string.
    ///
    /// On failure the provider keeps the hardcoded default (1024) rather
    /// than aborting startup.
    pub async fn probe_dimensions(mut self) -> Self {
        match self.embed(&[DIMENSION_PROBE_TEXT], InputType::SearchDocument).await {
            Ok(vectors) if !vectors.is_empty() => {
                self.dimensions = vectors[0].len();
                debug!(dimensions = self.dimensions, "probed embedding dimension");
            }
            Ok(_) => {
                warn!(fallback = DEFAULT_DIMENSIONS, "dimension probe returned no vectors");
            }
            Err(e) => {
                warn!(error = %e, fallback = DEFAULT_DIMENSIONS, "dimension probe failed");
            }
        }
        self
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: Vec<&'a str>,
    model: &'a str,
    input_type: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for CohereEmbeddingProvider {
    async fn embed(&self, texts: &[&str], input_type: InputType) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "Cohere",
            batch_size = texts.len(),
            input_type = input_type.as_str(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = EmbedRequest {
            texts: texts.to_vec(),
            model: &self.model,
            input_type: input_type.as_str(),
        };

        let response = self
            .client
            .post(format!("{COHERE_API_BASE}/embed"))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Cohere", error = %e, "embed request failed");
                RagError::EmbeddingError {
                    provider: "Cohere".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = "Cohere", %status, "embed API error");
            return Err(RagError::EmbeddingError {
                provider: "Cohere".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Cohere", error = %e, "failed to parse embed response");
            RagError::EmbeddingError {
                provider: "Cohere".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embed_response.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Reranker ───────────────────────────────────────────────────────

/// A [`Reranker`] backed by the Cohere `/v1/rerank` endpoint.
pub struct CohereReranker {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl CohereReranker {
    /// Create a new reranker with the given API key and the default
    /// model (`rerank-english-v3.0`).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::RerankerError {
                provider: "Cohere".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_RERANK_MODEL.into(),
        })
    }

    /// Create a new reranker using the `COHERE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(COHERE_API_KEY_VAR).map_err(|_| RagError::RerankerError {
            provider: "Cohere".into(),
            message: format!("{COHERE_API_KEY_VAR} environment variable not set"),
        })?;
        Self::new(api_key)
    }

    /// Set the rerank model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    documents: Vec<&'a str>,
    top_n: usize,
    model: &'a str,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankResultBody>,
}

#[derive(Deserialize)]
struct RerankResultBody {
    index: usize,
    relevance_score: f32,
}

#[async_trait]
impl Reranker for CohereReranker {
    async fn rerank(
        &self,
        query: &str,
        documents: &[&str],
        top_n: usize,
    ) -> Result<Vec<RankedDocument>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "Cohere",
            document_count = documents.len(),
            top_n,
            model = %self.model,
            "reranking candidates"
        );

        let request_body =
            RerankRequest { query, documents: documents.to_vec(), top_n, model: &self.model };

        let response = self
            .client
            .post(format!("{COHERE_API_BASE}/rerank"))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Cohere", error = %e, "rerank request failed");
                RagError::RerankerError {
                    provider: "Cohere".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = "Cohere", %status, "rerank API error");
            return Err(RagError::RerankerError {
                provider: "Cohere".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let rerank_response: RerankResponse = response.json().await.map_err(|e| {
            error!(provider = "Cohere", error = %e, "failed to parse rerank response");
            RagError::RerankerError {
                provider: "Cohere".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(rerank_response
            .results
            .into_iter()
            .map(|r| RankedDocument { index: r.index, relevance_score: r.relevance_score })
            .collect())
    }
}
