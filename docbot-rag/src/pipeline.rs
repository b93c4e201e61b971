//! Ingestion and retrieval pipeline orchestrators.
//!
//! [`IngestionPipeline`] runs one document's full indexing
//! (extract → split → embed → replace index contents) and
//! [`RetrievalPipeline`] runs one query's candidate retrieval
//! (embed → nearest-neighbor query → rerank). Both compose trait objects
//! and are constructed through builders.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docbot_rag::{IngestionPipeline, RagConfig, SentenceChunker, PdfExtractor};
//!
//! let ingestion = IngestionPipeline::builder()
//!     .config(RagConfig::default())
//!     .extractor(Arc::new(PdfExtractor::new()))
//!     .chunker(Arc::new(SentenceChunker::new(1000)))
//!     .embedding_provider(embedder.clone())
//!     .vector_store(store.clone())
//!     .build()?;
//!
//! ingestion.process(Path::new("paper.pdf")).await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{IndexEntry, ScoredChunk};
use crate::embedding::{EmbeddingProvider, InputType};
use crate::error::{RagError, Result};
use crate::extract::TextExtractor;
use crate::reranker::Reranker;
use crate::vectorstore::VectorStore;

/// Orchestrates one document's full indexing.
///
/// Every run is a complete re-index: the vector store's contents are
/// replaced wholesale, so the index only ever holds the most recently
/// processed document's chunks.
pub struct IngestionPipeline {
    config: RagConfig,
    extractor: Arc<dyn TextExtractor>,
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl IngestionPipeline {
    /// Create a new [`IngestionPipelineBuilder`].
    pub fn builder() -> IngestionPipelineBuilder {
        IngestionPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest the document at `path`: extract → split → embed → index.
    ///
    /// Returns the number of chunks indexed. An empty document is a
    /// logged no-op returning `Ok(0)`, not an error; the index is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Propagates the failing step's error without retrying:
    /// [`RagError::ExtractionError`], [`RagError::EmbeddingError`], or
    /// [`RagError::VectorStoreError`].
    pub async fn process(&self, path: &Path) -> Result<usize> {
        // 1. Extract text
        let text = self.extractor.extract(path).await?;
        info!(chars = text.len(), "extracted document text");

        // 2. Split into chunks
        let chunks = self.chunker.split(&text);
        if chunks.is_empty() {
            info!("no chunks produced, skipping indexing");
            return Ok(0);
        }
        info!(chunk_count = chunks.len(), "split text into chunks");

        // 3. Embed in batches
        let texts: Vec<&str> = chunks.iter().map(|c| c.as_str()).collect();
        let embeddings = self.embed_in_batches(&texts).await?;
        if embeddings.is_empty() {
            // Should not happen with non-empty chunks, but guard anyway.
            warn!("embedding produced no vectors, skipping indexing");
            return Ok(0);
        }
        if embeddings.len() != chunks.len() {
            return Err(RagError::PipelineError(format!(
                "embedding count {} does not match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }
        info!(embedding_count = embeddings.len(), "embedded chunks");

        // 4. Replace the index contents, keyed by ordinal
        self.vector_store.ensure_index(self.embedding_provider.dimensions()).await?;
        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, embedding))| IndexEntry { id: i.to_string(), embedding, text })
            .collect();
        self.vector_store.replace_all(&entries).await?;

        info!(entry_count = entries.len(), "indexed document");
        Ok(entries.len())
    }

    /// Embed texts for indexing, splitting into provider-sized batches.
    ///
    /// Batch boundaries do not affect the output vectors or their order.
    async fn embed_in_batches(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.embed_batch_size) {
            let batch_embeddings =
                self.embedding_provider.embed(batch, InputType::SearchDocument).await?;
            embeddings.extend(batch_embeddings);
        }
        Ok(embeddings)
    }
}

/// Builder for constructing an [`IngestionPipeline`].
#[derive(Default)]
pub struct IngestionPipelineBuilder {
    config: Option<RagConfig>,
    extractor: Option<Arc<dyn TextExtractor>>,
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
}

impl IngestionPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the text extractor.
    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Build the [`IngestionPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<IngestionPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let extractor = self
            .extractor
            .ok_or_else(|| RagError::ConfigError("extractor is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::ConfigError("chunker is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;

        Ok(IngestionPipeline { config, extractor, chunker, embedding_provider, vector_store })
    }
}

/// Orchestrates one query's candidate retrieval and reranking.
pub struct RetrievalPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    reranker: Arc<dyn Reranker>,
}

impl RetrievalPipeline {
    /// Create a new [`RetrievalPipelineBuilder`].
    pub fn builder() -> RetrievalPipelineBuilder {
        RetrievalPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Retrieve and rerank the chunks most relevant to `query`.
    ///
    /// Returns up to `rerank_top_n` chunks in reranked order. An index
    /// with no entries (or that has never been created) yields an empty
    /// result without invoking the reranker.
    ///
    /// # Errors
    ///
    /// Propagates [`RagError::EmbeddingError`],
    /// [`RagError::VectorStoreError`], or [`RagError::RerankerError`]
    /// from the failing step.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        // 1. Embed the query
        let mut vectors = self.embedding_provider.embed(&[query], InputType::SearchQuery).await?;
        let query_embedding = vectors.pop().ok_or_else(|| {
            RagError::PipelineError("embedding provider returned no query vector".to_string())
        })?;

        // 2. Nearest-neighbor candidates
        let candidates = self.vector_store.query(&query_embedding, self.config.retrieve_top_k).await?;
        if candidates.is_empty() {
            debug!("no candidates retrieved, skipping rerank");
            return Ok(Vec::new());
        }

        // 3. Rerank and map positions back to the original candidates
        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        let ranked = self.reranker.rerank(query, &texts, self.config.rerank_top_n).await?;

        let results: Vec<ScoredChunk> = ranked
            .into_iter()
            .filter_map(|r| {
                let Some(candidate) = candidates.get(r.index) else {
                    warn!(index = r.index, "reranker returned out-of-range index");
                    return None;
                };
                Some(ScoredChunk {
                    id: candidate.id.clone(),
                    text: candidate.text.clone(),
                    score: r.relevance_score,
                })
            })
            .collect();

        info!(candidate_count = texts.len(), result_count = results.len(), "retrieval completed");
        Ok(results)
    }
}

/// Builder for constructing a [`RetrievalPipeline`].
#[derive(Default)]
pub struct RetrievalPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    reranker: Option<Arc<dyn Reranker>>,
}

impl RetrievalPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the reranker.
    pub fn reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Build the [`RetrievalPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RetrievalPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let reranker = self
            .reranker
            .ok_or_else(|| RagError::ConfigError("reranker is required".to_string()))?;

        Ok(RetrievalPipeline { config, embedding_provider, vector_store, reranker })
    }
}
