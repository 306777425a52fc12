//! Replaying adapter for the `LlmClient` port.

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::format::{decode_result, Cassette, Port};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ApiError, ChatRequest, ChatResponse, CompletionFuture, LlmClient};

/// Answers completions from a cassette's LLM entries, in order.
///
/// Submitted requests are kept so tests can see exactly what was sent,
/// including how a prompt shrank between retries.
pub struct ReplayingLlmClient {
    replayer: Mutex<CassetteReplayer>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ReplayingLlmClient {
    /// Serves the LLM entries of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self {
            replayer: Mutex::new(CassetteReplayer::new(cassette, Port::Llm)),
            requests: Arc::default(),
        }
    }

    /// Shared handle to the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Arc<Mutex<Vec<ChatRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, request: &ChatRequest) -> CompletionFuture<'_> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        let output = self.replayer.lock().unwrap_or_else(PoisonError::into_inner).next_output();
        let result = decode_result::<ChatResponse, ApiError>(output)
            .unwrap_or_else(|e| panic!("unusable llm entry in cassette: {e}"));
        Box::pin(async move { result })
    }
}
