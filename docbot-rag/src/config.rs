//! Configuration for the ingestion and retrieval pipelines.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters shared by the ingestion and retrieval pipelines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Soft maximum chunk size in characters.
    pub chunk_size: usize,
    /// Maximum number of texts per embedding request on the ingestion path.
    pub embed_batch_size: usize,
    /// Number of nearest-neighbor candidates to fetch from the vector index.
    pub retrieve_top_k: usize,
    /// Number of candidates the reranker keeps.
    pub rerank_top_n: usize,
    /// Name of the vector index holding the active document's chunks.
    pub index_name: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            embed_batch_size: 90,
            retrieve_top_k: 10,
            rerank_top_n: 3,
            index_name: "rag-qa-bot".to_string(),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the soft maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the maximum number of texts per embedding request.
    pub fn embed_batch_size(mut self, size: usize) -> Self {
        self.config.embed_batch_size = size;
        self
    }

    /// Set the number of candidates fetched from the vector index.
    pub fn retrieve_top_k(mut self, k: usize) -> Self {
        self.config.retrieve_top_k = k;
        self
    }

    /// Set the number of candidates the reranker keeps.
    pub fn rerank_top_n(mut self, n: usize) -> Self {
        self.config.rerank_top_n = n;
        self
    }

    /// Set the vector index name.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.config.index_name = name.into();
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any size or count is zero or
    /// the index name is empty.
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if self.config.embed_batch_size == 0 {
            return Err(RagError::ConfigError(
                "embed_batch_size must be greater than zero".to_string(),
            ));
        }
        if self.config.retrieve_top_k == 0 {
            return Err(RagError::ConfigError(
                "retrieve_top_k must be greater than zero".to_string(),
            ));
        }
        if self.config.rerank_top_n == 0 {
            return Err(RagError::ConfigError(
                "rerank_top_n must be greater than zero".to_string(),
            ));
        }
        if self.config.index_name.is_empty() {
            return Err(RagError::ConfigError("index_name must not be empty".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_policy() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.embed_batch_size, 90);
        assert_eq!(config.retrieve_top_k, 10);
        assert_eq!(config.rerank_top_n, 3);
        assert_eq!(config.index_name, "rag-qa-bot");
    }

    #[test]
    fn builder_rejects_zero_sizes() {
        assert!(RagConfig::builder().chunk_size(0).build().is_err());
        assert!(RagConfig::builder().embed_batch_size(0).build().is_err());
        assert!(RagConfig::builder().retrieve_top_k(0).build().is_err());
        assert!(RagConfig::builder().rerank_top_n(0).build().is_err());
        assert!(RagConfig::builder().index_name("").build().is_err());
    }

    #[test]
    fn builder_accepts_overrides() {
        let config = RagConfig::builder()
            .chunk_size(200)
            .retrieve_top_k(5)
            .index_name("my-index")
            .build()
            .unwrap();
        assert_eq!(config.chunk_size, 200);
        assert_eq!(config.retrieve_top_k, 5);
        assert_eq!(config.index_name, "my-index");
    }
}
