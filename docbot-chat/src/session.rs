//! Session state owned by the presentation shell.

use serde::{Deserialize, Serialize};

use crate::engine::ConversationEngine;
use crate::error::{ChatError, Result};
use crate::model::ChatStream;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The model's answer.
    Assistant,
}

/// One turn of the shell-side transcript.
///
/// The transcript exists only for display; the generation provider keeps
/// its own history via the conversation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

/// Explicit single-active-session state, owned by the caller.
///
/// Holds the engine for the currently ready document (if any) and the
/// display transcript. Ingesting a new document replaces both: the old
/// engine (and its conversation identity) is discarded and the transcript
/// cleared.
#[derive(Default)]
pub struct SessionContext {
    engine: Option<ConversationEngine>,
    history: Vec<ChatMessage>,
}

impl SessionContext {
    /// Create an empty session with no document ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a document has been ingested and questions can be asked.
    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    /// Install the engine for a freshly ingested document, discarding any
    /// previous engine and clearing the transcript.
    pub fn document_ready(&mut self, engine: ConversationEngine) {
        self.engine = Some(engine);
        self.history.clear();
    }

    /// The display transcript for the current document's session.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Append a message to the display transcript.
    pub fn push_message(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(ChatMessage { role, content: content.into() });
    }

    /// Answer `user_message` with the current document's engine.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NotReady`] without contacting any provider if
    /// no document has been ingested.
    pub async fn respond(&self, user_message: &str) -> Result<ChatStream> {
        match &self.engine {
            Some(engine) => engine.respond(user_message).await,
            None => Err(ChatError::NotReady),
        }
    }
}
