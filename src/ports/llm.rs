//! LLM client port for chat completions.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`LlmClient`] to keep the trait dyn-compatible.
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ChatResponse, ApiError>> + Send + 'a>>;

/// One message of a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Speaker role (`"system"` or `"user"`).
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Body of a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// Ordered conversation sent to the model.
    pub messages: Vec<ChatMessage>,
}

/// Successful chat-completion response.
///
/// The whole JSON envelope is kept so it can be persisted verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    /// The response body exactly as returned by the service.
    pub envelope: serde_json::Value,
}

impl ChatResponse {
    /// Returns `choices[0].message.content`, if the envelope has one.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.envelope.pointer("/choices/0/message/content").and_then(serde_json::Value::as_str)
    }
}

/// A failed chat-completion call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status, or `None` when the request never got a response.
    pub status: Option<u16>,
    /// Response body, or a description of the transport failure.
    pub body: String,
}

impl ApiError {
    /// Builds an error for a request that never produced an HTTP response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self { status: None, body: message.into() }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "API error ({status}): {}", self.body),
            None => write!(f, "API request failed: {}", self.body),
        }
    }
}

impl std::error::Error for ApiError {}

/// Sends chat-completion requests to a language model.
pub trait LlmClient: Send + Sync {
    /// Submits one request and returns the response envelope.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] carrying the HTTP status and body for
    /// non-success responses, or a transport error with no status.
    fn complete(&self, request: &ChatRequest) -> CompletionFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_reads_first_choice() {
        let response = ChatResponse {
            envelope: json!({"choices": [{"message": {"role": "assistant", "content": "- a tool"}}]}),
        };
        assert_eq!(response.summary(), Some("- a tool"));
    }

    #[test]
    fn summary_missing_choices_is_none() {
        let response = ChatResponse { envelope: json!({"id": "x"}) };
        assert_eq!(response.summary(), None);
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError { status: Some(429), body: "slow down".into() };
        assert_eq!(err.to_string(), "API error (429): slow down");
        assert_eq!(ApiError::transport("dns").to_string(), "API request failed: dns");
    }
}
