//! Data types for index entries and retrieved chunks.

use serde::{Deserialize, Serialize};

/// A vector index entry: one embedded chunk of the active document.
///
/// Entry IDs are stringified ordinals (`"0"`, `"1"`, ...) dense from zero
/// for the currently indexed document. A fresh ingestion replaces every
/// entry, so IDs carry no identity across documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    /// Stringified ordinal position of the chunk within its document.
    pub id: String,
    /// The chunk's embedding vector.
    pub embedding: Vec<f32>,
    /// The chunk text, stored as the entry payload.
    pub text: String,
}

/// A chunk retrieved from the vector index, paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The index entry ID this chunk was stored under.
    pub id: String,
    /// The chunk text from the entry payload.
    pub text: String,
    /// Similarity or relevance score (higher is more relevant).
    pub score: f32,
}
