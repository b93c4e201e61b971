//! # docbot-rag
//!
//! Document ingestion and retrieval pipeline for DocBot: PDF text
//! extraction, sentence chunking, embedding, vector indexing, and
//! query-time retrieval with reranking.
//!
//! ## Overview
//!
//! Ingestion runs extract → split → embed → index as a full re-index per
//! document; the vector index holds exactly one document's chunks at a
//! time. Retrieval runs embed → nearest-neighbor query → rerank and
//! returns the top reranked chunks for use as grounding context.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docbot_rag::{
//!     CohereEmbeddingProvider, CohereReranker, IngestionPipeline, PdfExtractor,
//!     PineconeVectorStore, RagConfig, RetrievalPipeline, SentenceChunker,
//! };
//!
//! let config = RagConfig::default();
//! let embedder = Arc::new(CohereEmbeddingProvider::from_env()?.probe_dimensions().await);
//! let store = Arc::new(PineconeVectorStore::from_env(&config.index_name)?);
//!
//! let ingestion = IngestionPipeline::builder()
//!     .config(config.clone())
//!     .extractor(Arc::new(PdfExtractor::new()))
//!     .chunker(Arc::new(SentenceChunker::new(config.chunk_size)))
//!     .embedding_provider(embedder.clone())
//!     .vector_store(store.clone())
//!     .build()?;
//! ingestion.process(Path::new("paper.pdf")).await?;
//!
//! let retrieval = RetrievalPipeline::builder()
//!     .config(config)
//!     .embedding_provider(embedder)
//!     .vector_store(store)
//!     .reranker(Arc::new(CohereReranker::from_env()?))
//!     .build()?;
//! let chunks = retrieval.retrieve("what is the paper about?").await?;
//! ```

pub mod chunking;
pub mod cohere;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod inmemory;
pub mod pinecone;
pub mod pipeline;
pub mod reranker;
pub mod vectorstore;

pub use chunking::{Chunker, SentenceChunker};
pub use cohere::{CohereEmbeddingProvider, CohereReranker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{IndexEntry, ScoredChunk};
pub use embedding::{EmbeddingProvider, InputType};
pub use error::{RagError, Result};
pub use extract::{PdfExtractor, TextExtractor};
pub use inmemory::InMemoryVectorStore;
pub use pinecone::PineconeVectorStore;
pub use pipeline::{
    IngestionPipeline, IngestionPipelineBuilder, RetrievalPipeline, RetrievalPipelineBuilder,
};
pub use reranker::{RankedDocument, Reranker};
pub use vectorstore::VectorStore;
