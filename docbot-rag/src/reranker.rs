//! Reranker trait for re-scoring retrieved candidates.

use async_trait::async_trait;

use crate::error::Result;

/// A candidate's position in the original list with its rerank score.
///
/// The reranker is text-only: callers map `index` back to the original
/// candidate to recover payload fields beyond the raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDocument {
    /// Position of the document in the input slice.
    pub index: usize,
    /// Relevance score assigned by the reranker (higher is more relevant).
    pub relevance_score: f32,
}

/// A secondary relevance-scoring pass over a candidate set.
///
/// Typically more accurate but more expensive than the initial
/// nearest-neighbor retrieval.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rank `documents` by relevance to `query`, truncated to `top_n`.
    ///
    /// Returns ranked positions in descending relevance order.
    async fn rerank(
        &self,
        query: &str,
        documents: &[&str],
        top_n: usize,
    ) -> Result<Vec<RankedDocument>>;
}
