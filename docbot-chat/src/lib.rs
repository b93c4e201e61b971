//! # docbot-chat
//!
//! Conversation layer for DocBot: streamed, retrieval-grounded answers
//! over the currently ingested document.
//!
//! ## Overview
//!
//! [`ConversationEngine`] composes a `docbot-rag` retrieval pipeline with
//! a [`ChatModel`]: each user message is used verbatim as the search
//! query, retrieved chunks are de-duplicated and passed as grounding
//! documents, and the answer arrives as a lazy stream of text increments.
//! [`SessionContext`] is the caller-owned single-active-session state;
//! it signals not-ready instead of contacting providers when no document
//! has been ingested.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docbot_chat::{CohereChatModel, ConversationEngine, SessionContext};
//! use futures::StreamExt;
//!
//! let model = Arc::new(CohereChatModel::from_env()?);
//! let mut session = SessionContext::new();
//! session.document_ready(ConversationEngine::new(retrieval, model));
//!
//! let mut stream = session.respond("what does the paper conclude?").await?;
//! while let Some(increment) = stream.next().await {
//!     print!("{}", increment?);
//! }
//! ```

pub mod cohere;
pub mod engine;
pub mod error;
pub mod mock;
pub mod model;
pub mod session;

pub use cohere::CohereChatModel;
pub use engine::ConversationEngine;
pub use error::{ChatError, Result};
pub use mock::MockChatModel;
pub use model::{ChatModel, ChatRequest, ChatStream, GroundingDocument};
pub use session::{ChatMessage, Role, SessionContext};
