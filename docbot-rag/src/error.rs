//! Error types for the `docbot-rag` crate.

use thiserror::Error;

/// Errors that can occur in the ingestion and retrieval pipelines.
#[derive(Debug, Error)]
pub enum RagError {
    /// The document could not be opened or parsed.
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector index backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during result reranking.
    #[error("Reranker error ({provider}): {message}")]
    RerankerError {
        /// The rerank provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
