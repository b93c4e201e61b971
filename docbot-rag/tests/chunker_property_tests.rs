//! Property tests for the sentence chunker.

use docbot_rag::chunking::{Chunker, SentenceChunker};
use proptest::prelude::*;

/// Generate a sentence of lowercase words with single internal spaces.
fn arb_sentence() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{1,12}", 1..6).prop_map(|words| words.join(" "))
}

/// Generate text as sentences joined by the ". " delimiter.
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_sentence(), 1..30).prop_map(|sentences| sentences.join(". "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Concatenating the chunks (with a single space at each boundary,
    /// where the trailing delimiter space was trimmed) reconstructs the
    /// original text: no fragment lost or reordered.
    #[test]
    fn chunks_reconstruct_the_input(text in arb_text(), chunk_size in 10usize..200) {
        let chunker = SentenceChunker::new(chunk_size);
        let chunks = chunker.split(&text);
        prop_assert_eq!(chunks.join(" "), text);
    }

    /// Every chunk respects the soft size limit unless it consists of a
    /// single fragment that alone exceeds it.
    #[test]
    fn chunks_are_bounded_unless_single_fragment(text in arb_text(), chunk_size in 10usize..200) {
        let chunker = SentenceChunker::new(chunk_size);
        for chunk in chunker.split(&text) {
            let single_fragment = !chunk.trim_end_matches('.').contains(". ");
            prop_assert!(
                chunk.len() <= chunk_size || single_fragment,
                "multi-fragment chunk exceeds size {}: {:?}",
                chunk_size,
                chunk
            );
        }
    }

    /// Same input and chunk size always produce the same chunk sequence.
    #[test]
    fn chunking_is_deterministic(text in arb_text(), chunk_size in 10usize..200) {
        let chunker = SentenceChunker::new(chunk_size);
        prop_assert_eq!(chunker.split(&text), chunker.split(&text));
    }
}
