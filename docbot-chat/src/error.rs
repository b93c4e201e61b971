//! Error types for the `docbot-chat` crate.

use docbot_rag::RagError;
use thiserror::Error;

/// Errors that can occur while generating a conversational answer.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No document has been ingested yet, so there is nothing to answer
    /// questions about. No provider is contacted in this state.
    #[error("no document is ready; ingest a document before asking questions")]
    NotReady,

    /// An error from the generation provider.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error propagated from the retrieval pipeline.
    #[error(transparent)]
    Rag(#[from] RagError),
}

/// A convenience result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
