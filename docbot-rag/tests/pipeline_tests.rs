//! End-to-end pipeline tests against the in-memory vector store with
//! deterministic mock providers.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docbot_rag::chunking::SentenceChunker;
use docbot_rag::config::RagConfig;
use docbot_rag::embedding::{EmbeddingProvider, InputType};
use docbot_rag::error::Result;
use docbot_rag::extract::TextExtractor;
use docbot_rag::inmemory::InMemoryVectorStore;
use docbot_rag::pipeline::{IngestionPipeline, RetrievalPipeline};
use docbot_rag::reranker::{RankedDocument, Reranker};

/// Extractor that returns a fixed string instead of reading a file.
struct StaticExtractor {
    text: String,
}

impl StaticExtractor {
    fn new(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

#[async_trait]
impl TextExtractor for StaticExtractor {
    async fn extract(&self, _path: &Path) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Deterministic embedder: the vector depends only on the text, never on
/// batch composition. Counts embed calls.
struct MockEmbedder {
    calls: AtomicUsize,
}

impl MockEmbedder {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(text: &str) -> Vec<f32> {
        let bytes = text.as_bytes();
        let sum: u32 = bytes.iter().map(|b| u32::from(*b)).sum();
        vec![
            text.len() as f32,
            f32::from(bytes.first().copied().unwrap_or(0)),
            (sum % 97) as f32,
            (text.split_whitespace().count()) as f32,
        ]
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, texts: &[&str], _input_type: InputType) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// Reranker that ranks candidates by descending text length and counts
/// invocations.
struct LengthReranker {
    calls: AtomicUsize,
}

impl LengthReranker {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reranker for LengthReranker {
    async fn rerank(
        &self,
        _query: &str,
        documents: &[&str],
        top_n: usize,
    ) -> Result<Vec<RankedDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut ranked: Vec<RankedDocument> = documents
            .iter()
            .enumerate()
            .map(|(index, doc)| RankedDocument { index, relevance_score: doc.len() as f32 })
            .collect();
        ranked.sort_by(|a, b| {
            b.relevance_score.partial_cmp(&a.relevance_score).unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(top_n);
        Ok(ranked)
    }
}

fn ingestion(
    config: RagConfig,
    text: &str,
    embedder: Arc<MockEmbedder>,
    store: Arc<InMemoryVectorStore>,
) -> IngestionPipeline {
    IngestionPipeline::builder()
        .config(config.clone())
        .extractor(Arc::new(StaticExtractor::new(text)))
        .chunker(Arc::new(SentenceChunker::new(config.chunk_size)))
        .embedding_provider(embedder)
        .vector_store(store)
        .build()
        .unwrap()
}

fn retrieval(
    config: RagConfig,
    embedder: Arc<MockEmbedder>,
    store: Arc<InMemoryVectorStore>,
    reranker: Arc<LengthReranker>,
) -> RetrievalPipeline {
    RetrievalPipeline::builder()
        .config(config)
        .embedding_provider(embedder)
        .vector_store(store)
        .reranker(reranker)
        .build()
        .unwrap()
}

const FIVE_SENTENCES: &str = "Rust has a strong type system. Ownership prevents data races. \
                              The borrow checker enforces lifetimes. Cargo manages dependencies. \
                              Traits enable polymorphism.";

#[tokio::test]
async fn ingest_then_retrieve_reranks_candidates() {
    // Scenario: 5 chunks indexed, retrieve_top_k larger than the corpus,
    // rerank keeps 3.
    let config = RagConfig::builder()
        .chunk_size(20)
        .retrieve_top_k(10)
        .rerank_top_n(3)
        .build()
        .unwrap();

    let embedder = Arc::new(MockEmbedder::new());
    let store = Arc::new(InMemoryVectorStore::new());
    let reranker = Arc::new(LengthReranker::new());

    let indexed = ingestion(config.clone(), FIVE_SENTENCES, embedder.clone(), store.clone())
        .process(Path::new("unused.pdf"))
        .await
        .unwrap();
    assert_eq!(indexed, 5);

    let results = retrieval(config, embedder, store, reranker.clone())
        .retrieve("how does rust prevent bugs?")
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(reranker.call_count(), 1);

    // Reranked order: descending text length, no duplicates.
    let mut texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    texts.dedup();
    assert_eq!(texts.len(), 3);
}

#[tokio::test]
async fn reingestion_replaces_all_entries() {
    let config = RagConfig::builder().chunk_size(20).build().unwrap();
    let embedder = Arc::new(MockEmbedder::new());
    let store = Arc::new(InMemoryVectorStore::new());

    let doc_a = "Alpha first sentence. Alpha second sentence. Alpha third sentence.";
    let doc_b = "Beta opening line. Beta closing line.";

    ingestion(config.clone(), doc_a, embedder.clone(), store.clone())
        .process(Path::new("a.pdf"))
        .await
        .unwrap();
    assert_eq!(store.entries().await.len(), 3);

    ingestion(config, doc_b, embedder, store.clone())
        .process(Path::new("b.pdf"))
        .await
        .unwrap();

    let entries = store.entries().await;
    assert_eq!(entries.len(), 2);
    // IDs are re-based at 0 and no chunk of document A survives.
    assert_eq!(entries[0].id, "0");
    assert_eq!(entries[1].id, "1");
    for entry in &entries {
        assert!(entry.text.starts_with("Beta"), "stale entry: {:?}", entry.text);
    }
}

#[tokio::test]
async fn empty_document_is_a_noop() {
    let config = RagConfig::default();
    let embedder = Arc::new(MockEmbedder::new());
    let store = Arc::new(InMemoryVectorStore::new());

    let indexed = ingestion(config, "", embedder.clone(), store.clone())
        .process(Path::new("empty.pdf"))
        .await
        .unwrap();

    assert_eq!(indexed, 0);
    // Nothing was embedded and the index was never touched.
    assert_eq!(embedder.call_count(), 0);
    assert!(store.entries().await.is_empty());
}

#[tokio::test]
async fn query_against_uncreated_index_skips_reranker() {
    let config = RagConfig::default();
    let embedder = Arc::new(MockEmbedder::new());
    let store = Arc::new(InMemoryVectorStore::new());
    let reranker = Arc::new(LengthReranker::new());

    let results = retrieval(config, embedder, store, reranker.clone())
        .retrieve("anything")
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(reranker.call_count(), 0);
}

#[tokio::test]
async fn batching_is_invisible_in_output() {
    let doc = FIVE_SENTENCES;

    let batched_config =
        RagConfig::builder().chunk_size(20).embed_batch_size(2).build().unwrap();
    let unbatched_config =
        RagConfig::builder().chunk_size(20).embed_batch_size(90).build().unwrap();

    let batched_embedder = Arc::new(MockEmbedder::new());
    let batched_store = Arc::new(InMemoryVectorStore::new());
    ingestion(batched_config, doc, batched_embedder.clone(), batched_store.clone())
        .process(Path::new("doc.pdf"))
        .await
        .unwrap();

    let unbatched_embedder = Arc::new(MockEmbedder::new());
    let unbatched_store = Arc::new(InMemoryVectorStore::new());
    ingestion(unbatched_config, doc, unbatched_embedder.clone(), unbatched_store.clone())
        .process(Path::new("doc.pdf"))
        .await
        .unwrap();

    // 5 chunks: three requests at batch size 2, one at batch size 90.
    assert_eq!(batched_embedder.call_count(), 3);
    assert_eq!(unbatched_embedder.call_count(), 1);

    // Same vectors, same order, regardless of batch boundaries.
    assert_eq!(batched_store.entries().await, unbatched_store.entries().await);
}
