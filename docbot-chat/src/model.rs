//! Chat model trait for streamed, grounded generation.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A retrieved text snippet supplied to the model as grounding context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroundingDocument {
    /// The snippet text.
    pub text: String,
}

/// One grounded generation request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The user's message, used verbatim as the prompt.
    pub message: String,
    /// De-duplicated grounding documents for this turn.
    pub documents: Vec<GroundingDocument>,
    /// Opaque token correlating turns so the provider can maintain its
    /// own conversation history.
    pub conversation_id: String,
}

/// A finite, forward-only sequence of text increments.
///
/// The caller concatenates increments to reconstruct the full answer and
/// may display partial progress as they arrive. Errors terminate the
/// sequence; dropping the stream early stops network consumption.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A conversational text-generation model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Start a streamed generation for the given request.
    ///
    /// Provider errors may surface either from this call or as an error
    /// item inside the returned stream.
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream>;
}
