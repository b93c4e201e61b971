//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// Whether a text is being embedded for indexing or for searching.
///
/// Providers may produce different vectors for the same text depending on
/// this mode, so the distinction must be preserved exactly: ingestion
/// always embeds with [`InputType::SearchDocument`], retrieval with
/// [`InputType::SearchQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    /// A document chunk being indexed.
    SearchDocument,
    /// A user query being searched.
    SearchQuery,
}

impl InputType {
    /// The provider-side wire name for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::SearchDocument => "search_document",
            InputType::SearchQuery => "search_query",
        }
    }
}

/// A provider that generates fixed-dimension vector embeddings from text.
///
/// Implementations wrap a specific embedding backend behind a unified
/// async interface. Output order matches input order, one vector per text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate one embedding vector per input text, order-preserving.
    async fn embed(&self, texts: &[&str], input_type: InputType) -> Result<Vec<Vec<f32>>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
