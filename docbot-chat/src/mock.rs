//! Mock chat model for testing.

use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;

use crate::error::Result;
use crate::model::{ChatModel, ChatRequest, ChatStream};

/// A [`ChatModel`] that streams scripted increments and records every
/// request it receives.
#[derive(Default)]
pub struct MockChatModel {
    deltas: Vec<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    /// Create a mock that streams the given increments in order.
    pub fn new(deltas: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            deltas: deltas.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The requests received so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream> {
        self.requests.lock().expect("mock lock poisoned").push(request);
        let deltas: Vec<Result<String>> = self.deltas.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(deltas)))
    }
}
