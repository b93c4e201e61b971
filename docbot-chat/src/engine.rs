//! The conversation engine: retrieval-grounded, streamed answers.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use docbot_rag::RetrievalPipeline;

use crate::error::Result;
use crate::model::{ChatModel, ChatRequest, ChatStream, GroundingDocument};

/// Turns a user message into a streamed, grounded answer.
///
/// One engine serves one ingested document: it is created after ingestion
/// succeeds and discarded (along with its conversation identity) when a
/// new document is ingested. The generation provider manages its own turn
/// history, correlated by the engine's conversation id.
pub struct ConversationEngine {
    retrieval: Arc<RetrievalPipeline>,
    model: Arc<dyn ChatModel>,
    conversation_id: String,
}

impl ConversationEngine {
    /// Create a new engine with a fresh conversation identity.
    pub fn new(retrieval: Arc<RetrievalPipeline>, model: Arc<dyn ChatModel>) -> Self {
        Self { retrieval, model, conversation_id: Uuid::new_v4().to_string() }
    }

    /// The opaque token correlating this engine's turns at the provider.
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Answer `user_message` as a stream of text increments.
    ///
    /// The raw message is used verbatim as the search query (no query
    /// expansion). Retrieved chunks are de-duplicated by exact text,
    /// preserving first-seen order, before being passed as grounding
    /// documents.
    ///
    /// # Errors
    ///
    /// Retrieval failures surface from this call; generation failures may
    /// also surface as an error item inside the returned stream.
    pub async fn respond(&self, user_message: &str) -> Result<ChatStream> {
        debug!(query = user_message, "using user message as search query");

        let candidates = self.retrieval.retrieve(user_message).await?;

        let mut seen = HashSet::new();
        let mut documents = Vec::new();
        for candidate in candidates {
            if seen.insert(candidate.text.clone()) {
                documents.push(GroundingDocument { text: candidate.text });
            }
        }

        if documents.is_empty() {
            info!("no grounding documents retrieved");
        } else {
            info!(document_count = documents.len(), "retrieved grounding documents");
        }

        let request = ChatRequest {
            message: user_message.to_string(),
            documents,
            conversation_id: self.conversation_id.clone(),
        };

        self.model.chat_stream(request).await
    }
}
