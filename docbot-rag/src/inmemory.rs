//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] mirrors the remote store's contract (create,
//! full replace, nearest-neighbor query) without any network dependency.
//! It backs tests and local runs.

use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::document::{IndexEntry, ScoredChunk};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// An in-memory [`VectorStore`] using cosine similarity for search.
///
/// The index starts out "not created"; until [`ensure_index`](VectorStore::ensure_index)
/// runs, queries return empty and replace fails, matching the remote
/// store's behavior.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    index: RwLock<Option<Index>>,
}

#[derive(Debug)]
struct Index {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl InMemoryVectorStore {
    /// Create a new store with no index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current entries, ordered by insertion (ordinal).
    ///
    /// Intended for tests and debugging.
    pub async fn entries(&self) -> Vec<IndexEntry> {
        match self.index.read().await.as_ref() {
            Some(index) => index.entries.clone(),
            None => Vec::new(),
        }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_index(&self, dimensions: usize) -> Result<()> {
        let mut index = self.index.write().await;
        match index.as_ref() {
            Some(existing) if existing.dimensions != dimensions => {
                Err(RagError::VectorStoreError {
                    backend: "in-memory".to_string(),
                    message: format!(
                        "index exists with dimension {}, expected {dimensions}",
                        existing.dimensions
                    ),
                })
            }
            Some(_) => Ok(()),
            None => {
                *index = Some(Index { dimensions, entries: Vec::new() });
                Ok(())
            }
        }
    }

    async fn replace_all(&self, entries: &[IndexEntry]) -> Result<()> {
        let mut index = self.index.write().await;
        let index = index.as_mut().ok_or_else(|| RagError::VectorStoreError {
            backend: "in-memory".to_string(),
            message: "index has not been created".to_string(),
        })?;
        index.entries = entries.to_vec();
        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let index = self.index.read().await;
        let Some(index) = index.as_ref() else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredChunk> = index
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                id: entry.id.clone(),
                text: entry.text.clone(),
                score: cosine_similarity(&entry.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, embedding: Vec<f32>, text: &str) -> IndexEntry {
        IndexEntry { id: id.to_string(), embedding, text: text.to_string() }
    }

    #[tokio::test]
    async fn query_before_creation_returns_empty() {
        let store = InMemoryVectorStore::new();
        let results = store.query(&[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn replace_before_creation_fails() {
        let store = InMemoryVectorStore::new();
        let err = store.replace_all(&[entry("0", vec![1.0], "a")]).await.unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
    }

    #[tokio::test]
    async fn search_orders_by_cosine_similarity() {
        let store = InMemoryVectorStore::new();
        store.ensure_index(2).await.unwrap();
        store
            .replace_all(&[
                entry("0", vec![1.0, 0.0], "aligned"),
                entry("1", vec![0.0, 1.0], "orthogonal"),
                entry("2", vec![0.7, 0.7], "diagonal"),
            ])
            .await
            .unwrap();

        let results = store.query(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "aligned");
        assert_eq!(results[1].text, "diagonal");
    }

    #[tokio::test]
    async fn replace_all_discards_previous_entries() {
        let store = InMemoryVectorStore::new();
        store.ensure_index(1).await.unwrap();
        store
            .replace_all(&[entry("0", vec![1.0], "old a"), entry("1", vec![1.0], "old b")])
            .await
            .unwrap();
        store.replace_all(&[entry("0", vec![1.0], "new")]).await.unwrap();

        let entries = store.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "new");
        assert_eq!(entries[0].id, "0");
    }

    #[tokio::test]
    async fn ensure_index_rejects_dimension_mismatch() {
        let store = InMemoryVectorStore::new();
        store.ensure_index(4).await.unwrap();
        assert!(store.ensure_index(8).await.is_err());
        assert!(store.ensure_index(4).await.is_ok());
    }
}
