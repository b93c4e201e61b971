//! Terminal launcher for DocBot.
//!
//! Ingests one PDF into the vector index, then runs an interactive
//! question/answer loop, printing the answer incrementally as the model
//! streams it.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use docbot_chat::{CohereChatModel, ConversationEngine, Role, SessionContext};
use docbot_rag::{
    CohereEmbeddingProvider, CohereReranker, IngestionPipeline, InMemoryVectorStore, PdfExtractor,
    PineconeVectorStore, RagConfig, RetrievalPipeline, SentenceChunker, VectorStore,
};

/// Ask questions about a PDF document.
///
/// Requires `COHERE_API_KEY` (embeddings, reranking, chat) and, unless
/// `--in-memory` is set, `PINECONE_API_KEY` (vector index).
#[derive(Parser)]
#[command(name = "docbot", version)]
struct Args {
    /// Path to the PDF document to ingest
    pdf: PathBuf,

    /// Vector index name
    #[arg(long, default_value = "rag-qa-bot")]
    index_name: String,

    /// Soft chunk size in characters
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Nearest-neighbor candidates fetched per query
    #[arg(long, default_value_t = 10)]
    retrieve_top_k: usize,

    /// Candidates kept by the reranker
    #[arg(long, default_value_t = 3)]
    rerank_top_n: usize,

    /// Use an in-memory vector store instead of Pinecone
    #[arg(long)]
    in_memory: bool,

    /// Override the Cohere embedding model
    #[arg(long)]
    embed_model: Option<String>,

    /// Override the Cohere rerank model
    #[arg(long)]
    rerank_model: Option<String>,

    /// Override the Cohere chat model
    #[arg(long)]
    chat_model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = RagConfig::builder()
        .chunk_size(args.chunk_size)
        .retrieve_top_k(args.retrieve_top_k)
        .rerank_top_n(args.rerank_top_n)
        .index_name(&args.index_name)
        .build()?;

    let mut embedder = CohereEmbeddingProvider::from_env()
        .context("failed to configure the Cohere embedding provider")?;
    if let Some(model) = &args.embed_model {
        embedder = embedder.with_model(model);
    }
    let embedder = Arc::new(embedder.probe_dimensions().await);
    let store: Arc<dyn VectorStore> = if args.in_memory {
        Arc::new(InMemoryVectorStore::new())
    } else {
        Arc::new(
            PineconeVectorStore::from_env(&config.index_name)
                .context("failed to configure the Pinecone vector store")?,
        )
    };
    let mut reranker =
        CohereReranker::from_env().context("failed to configure the Cohere reranker")?;
    if let Some(model) = &args.rerank_model {
        reranker = reranker.with_model(model);
    }
    let reranker = Arc::new(reranker);

    let mut chat_model =
        CohereChatModel::from_env().context("failed to configure the Cohere chat model")?;
    if let Some(model) = &args.chat_model {
        chat_model = chat_model.with_model(model);
    }
    let chat_model = Arc::new(chat_model);

    println!("Processing {} ...", args.pdf.display());
    let ingestion = IngestionPipeline::builder()
        .config(config.clone())
        .extractor(Arc::new(PdfExtractor::new()))
        .chunker(Arc::new(SentenceChunker::new(config.chunk_size)))
        .embedding_provider(embedder.clone())
        .vector_store(store.clone())
        .build()?;

    let chunk_count = ingestion.process(&args.pdf).await?;
    if chunk_count == 0 {
        println!("The document produced no text to index.");
        return Ok(());
    }
    println!("Indexed {chunk_count} chunks. Ask a question (Ctrl-D to quit).");

    let retrieval = Arc::new(
        RetrievalPipeline::builder()
            .config(config)
            .embedding_provider(embedder)
            .vector_store(store)
            .reranker(reranker)
            .build()?,
    );

    let mut session = SessionContext::new();
    session.document_ready(ConversationEngine::new(retrieval, chat_model));

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(question);
                if let Err(e) = answer(&mut session, question).await {
                    eprintln!("error: {e}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Stream one answer to stdout, then record the turn in the transcript.
async fn answer(session: &mut SessionContext, question: &str) -> anyhow::Result<()> {
    let mut stream = session.respond(question).await?;

    print!("docbot> ");
    std::io::stdout().flush()?;

    let mut full_response = String::new();
    while let Some(increment) = stream.next().await {
        match increment {
            Ok(text) => {
                print!("{text}");
                std::io::stdout().flush()?;
                full_response.push_str(&text);
            }
            Err(e) => {
                // Whatever partial text was printed stays visible.
                println!();
                return Err(e.into());
            }
        }
    }
    println!();

    session.push_message(Role::User, question);
    session.push_message(Role::Assistant, full_response);
    Ok(())
}
