//! Cohere streaming chat client.
//!
//! [`CohereChatModel`] calls the Cohere `/v1/chat` endpoint with
//! `stream: true`. The response is a sequence of newline-delimited JSON
//! events; only `text-generation` events are surfaced as increments,
//! every other event kind is ignored.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ChatError, Result};
use crate::model::{ChatModel, ChatRequest, ChatStream, GroundingDocument};

/// Base URL for the Cohere v1 API.
const COHERE_API_BASE: &str = "https://api.cohere.com/v1";

/// The default Cohere chat model.
const DEFAULT_CHAT_MODEL: &str = "command-r-08-2024";

/// Environment variable holding the Cohere API key.
const COHERE_API_KEY_VAR: &str = "COHERE_API_KEY";

/// A [`ChatModel`] backed by the Cohere streaming chat API.
pub struct CohereChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl CohereChatModel {
    /// Create a new chat model with the given API key and the default
    /// model (`command-r-08-2024`).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(generation_error("API key must not be empty"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_CHAT_MODEL.into(),
        })
    }

    /// Create a new chat model using the `COHERE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(COHERE_API_KEY_VAR).map_err(|_| {
            generation_error(format!("{COHERE_API_KEY_VAR} environment variable not set"))
        })?;
        Self::new(api_key)
    }

    /// Set the chat model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

fn generation_error(message: impl Into<String>) -> ChatError {
    ChatError::GenerationError { provider: "Cohere".to_string(), message: message.into() }
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    message: &'a str,
    model: &'a str,
    documents: &'a [GroundingDocument],
    conversation_id: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct StreamEvent {
    event_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Parse one event line, returning the increment if it is a
/// `text-generation` event.
fn parse_text_event(line: &[u8]) -> Option<String> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    if line.is_empty() {
        return None;
    }
    match serde_json::from_slice::<StreamEvent>(line) {
        Ok(event) if event.event_type == "text-generation" => event.text,
        Ok(event) => {
            debug!(event_type = %event.event_type, "ignoring non-text chat event");
            None
        }
        Err(e) => {
            debug!(error = %e, "skipping unparsable chat event line");
            None
        }
    }
}

#[async_trait]
impl ChatModel for CohereChatModel {
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream> {
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let model = self.model.clone();

        let stream = try_stream! {
            debug!(
                provider = "Cohere",
                model = %model,
                document_count = request.documents.len(),
                conversation_id = %request.conversation_id,
                "starting chat stream"
            );

            let request_body = ChatRequestBody {
                message: &request.message,
                model: &model,
                documents: &request.documents,
                conversation_id: &request.conversation_id,
                stream: true,
            };

            let response = client
                .post(format!("{COHERE_API_BASE}/chat"))
                .bearer_auth(&api_key)
                .json(&request_body)
                .send()
                .await
                .map_err(|e| {
                    error!(provider = "Cohere", error = %e, "chat request failed");
                    generation_error(format!("request failed: {e}"))
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                error!(provider = "Cohere", %status, "chat API error");
                Err(generation_error(format!("API returned {status}: {detail}")))?;
            } else {
                // The body is NDJSON; chunks can split lines (and multi-byte
                // characters), so buffer bytes and cut on newlines.
                let mut bytes_stream = response.bytes_stream();
                let mut buffer: Vec<u8> = Vec::new();

                while let Some(item) = bytes_stream.next().await {
                    let bytes = item.map_err(|e| {
                        error!(provider = "Cohere", error = %e, "chat stream error");
                        generation_error(format!("stream error: {e}"))
                    })?;
                    buffer.extend_from_slice(&bytes);

                    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                        let line: Vec<u8> = buffer.drain(..=pos).collect();
                        if let Some(text) = parse_text_event(&line) {
                            yield text;
                        }
                    }
                }

                // Trailing event without a final newline.
                if let Some(text) = parse_text_event(&buffer) {
                    yield text;
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_generation_events_are_surfaced() {
        let line = br#"{"event_type":"text-generation","text":"Hello"}"#;
        assert_eq!(parse_text_event(line), Some("Hello".to_string()));
    }

    #[test]
    fn other_event_kinds_are_ignored() {
        assert_eq!(parse_text_event(br#"{"event_type":"stream-start"}"#), None);
        assert_eq!(
            parse_text_event(br#"{"event_type":"stream-end","finish_reason":"COMPLETE"}"#),
            None
        );
        assert_eq!(parse_text_event(b""), None);
        assert_eq!(parse_text_event(b"\n"), None);
        assert_eq!(parse_text_event(b"not json"), None);
    }

    #[test]
    fn trailing_newline_is_stripped() {
        let line = b"{\"event_type\":\"text-generation\",\"text\":\"hi\"}\n";
        assert_eq!(parse_text_event(line), Some("hi".to_string()));
    }
}
