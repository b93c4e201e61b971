//! Vector store trait for the single-document index.

use async_trait::async_trait;

use crate::document::{IndexEntry, ScoredChunk};
use crate::error::Result;

/// A remote key→(vector, payload) store with nearest-neighbor query.
///
/// The store holds exactly one document's chunks at a time: every
/// ingestion clears the whole index before upserting the new entries.
/// There is no incremental update path and no per-document namespacing;
/// concurrent writers are not supported.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the index if absent, with cosine similarity and the given
    /// dimension, and wait until it reports ready.
    ///
    /// If the index already exists with a different dimension, this is an
    /// error: all stored vectors must share one dimension.
    async fn ensure_index(&self, dimensions: usize) -> Result<()>;

    /// Clear all existing entries, then upsert the given entries.
    ///
    /// Requires a prior successful [`ensure_index`](VectorStore::ensure_index).
    async fn replace_all(&self, entries: &[IndexEntry]) -> Result<()>;

    /// Return the `top_k` most similar entries, most similar first.
    ///
    /// If the index has never been created (no document ingested yet),
    /// returns an empty result rather than failing.
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;
}
