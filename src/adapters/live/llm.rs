//! Live adapter for the `LlmClient` port using an Azure-style chat-completions API.

use reqwest::Client;

use crate::config::ApiConfig;
use crate::ports::llm::{ApiError, ChatRequest, ChatResponse, CompletionFuture, LlmClient};

/// Live LLM client that POSTs chat requests to the configured deployment.
pub struct LiveLlmClient {
    client: Client,
    config: ApiConfig,
}

impl LiveLlmClient {
    /// Creates a new live LLM client for the given endpoint configuration.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self { client: Client::new(), config }
    }
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &ChatRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let url = self.config.endpoint();
            tracing::debug!(%url, "sending chat completion request");

            let response = self
                .client
                .post(&url)
                .header("api-key", &self.config.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| ApiError::transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::transport(format!("failed to read response body: {e}")))?;

            tracing::debug!(status = status.as_u16(), bytes = body.len(), "response received");

            if !status.is_success() {
                return Err(ApiError { status: Some(status.as_u16()), body });
            }

            let envelope = serde_json::from_str(&body).map_err(|e| ApiError {
                status: Some(status.as_u16()),
                body: format!("failed to parse response body: {e}"),
            })?;

            Ok(ChatResponse { envelope })
        })
    }
}

/// Stand-in used when no API configuration is available.
///
/// Every call fails with a non-retryable error so commands that never reach
/// the network (scan, clean) run without credentials.
pub struct UnconfiguredLlmClient;

impl LlmClient for UnconfiguredLlmClient {
    fn complete(&self, _request: &ChatRequest) -> CompletionFuture<'_> {
        Box::pin(async {
            Err(ApiError::transport("chat completion API is not configured"))
        })
    }
}
