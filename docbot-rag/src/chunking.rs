//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`SentenceChunker`], a
//! greedy sentence-concatenation splitter that packs ". "-delimited
//! fragments into character-bounded chunks.

/// A strategy for splitting extracted text into chunks.
pub trait Chunker: Send + Sync {
    /// Split text into an ordered sequence of chunk strings.
    ///
    /// Returns an empty `Vec` for empty input.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Greedy sentence packer bounded by a soft character limit.
///
/// Text is split on the literal delimiter `". "` and fragments are
/// accumulated into a buffer; the buffer is closed (trimmed) whenever the
/// next fragment would make it reach or exceed `chunk_size`. There is no
/// overlap and no hard truncation: a single fragment longer than
/// `chunk_size` becomes its own oversized chunk. Boundary detection is
/// purely the literal substring, so abbreviations and decimal numbers are
/// not handled specially.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    chunk_size: usize,
}

impl SentenceChunker {
    /// Create a new `SentenceChunker` with the given soft size limit.
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Chunker for SentenceChunker {
    fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let fragments: Vec<&str> = text.split(". ").collect();
        let last = fragments.len() - 1;

        let mut chunks = Vec::new();
        let mut current = String::new();

        for (i, fragment) in fragments.iter().enumerate() {
            if !current.is_empty() && current.len() + fragment.len() >= self.chunk_size {
                chunks.push(current.trim().to_string());
                current.clear();
            }
            current.push_str(fragment);
            // Only fragments that were actually followed by the delimiter
            // get it re-appended, so concatenation reconstructs the input.
            if i < last {
                current.push_str(". ");
            }
        }

        let trimmed = current.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunker = SentenceChunker::new(1000);
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = SentenceChunker::new(1000);
        let chunks = chunker.split("The sky is blue. Grass is green.");
        assert_eq!(chunks, vec!["The sky is blue. Grass is green."]);
    }

    #[test]
    fn greedy_boundary_behavior() {
        let chunker = SentenceChunker::new(20);
        let chunks = chunker.split("The sky is blue. Grass is green. Water is wet.");
        assert_eq!(chunks, vec!["The sky is blue.", "Grass is green.", "Water is wet."]);
    }

    #[test]
    fn oversized_fragment_becomes_its_own_chunk() {
        let chunker = SentenceChunker::new(10);
        let long = "a".repeat(40);
        let text = format!("Short one. {long}. Tail");
        let chunks = chunker.split(&text);
        assert_eq!(chunks, vec!["Short one.".to_string(), format!("{long}."), "Tail".to_string()]);
    }

    #[test]
    fn deterministic_for_same_input() {
        let chunker = SentenceChunker::new(50);
        let text = "One sentence here. Another sentence there. And a third one. Plus a fourth.";
        assert_eq!(chunker.split(text), chunker.split(text));
    }

    #[test]
    fn chunks_respect_soft_size_limit() {
        let chunker = SentenceChunker::new(60);
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota. \
                    Kappa lambda mu. Nu xi omicron. Pi rho sigma.";
        for chunk in chunker.split(text) {
            assert!(chunk.len() <= 60, "chunk too long: {chunk:?}");
        }
    }
}
