//! Recording adapter for the `LlmClient` port.

use std::sync::Arc;

use super::capture;
use crate::cassette::session::SharedRecorder;
use crate::ports::{ChatRequest, CompletionFuture, LlmClient};

/// Forwards completions to an inner client and captures request and result.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: SharedRecorder,
}

impl RecordingLlmClient {
    /// Wraps `inner`, capturing into `recorder`.
    pub fn new(inner: Box<dyn LlmClient>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, request: &ChatRequest) -> CompletionFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.complete(&request).await;
            capture(&recorder, |r| r.record_result(&request, &result));
            result
        })
    }
}
