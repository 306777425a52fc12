//! Bounded submission loop that shrinks the prompt on context-length errors.

use crate::ports::llm::{ApiError, ChatRequest, ChatResponse, LlmClient};

/// Error code the service uses when the input exceeds the context window.
pub const CONTEXT_LENGTH_EXCEEDED: &str = "context_length_exceeded";

/// How many times to try and how much to cut between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: usize,
    /// Characters removed from the end of the user message per retry.
    pub truncate_chars: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 10, truncate_chars: 500 }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// The prompt was too long: shorten it and try again.
    TruncateAndRetry,
    /// Anything else: give up on this directory for this run.
    Fatal,
}

/// Classifies a failed call.
///
/// Only a 400 carrying the context-length code is retryable. The code is
/// read from the JSON `error.code` field; a body that is not JSON falls back
/// to a plain search for the code.
#[must_use]
pub fn classify(err: &ApiError) -> Retry {
    if err.status != Some(400) {
        return Retry::Fatal;
    }
    let exceeded = match serde_json::from_str::<serde_json::Value>(&err.body) {
        Ok(body) => body.pointer("/error/code").and_then(serde_json::Value::as_str)
            == Some(CONTEXT_LENGTH_EXCEEDED),
        Err(_) => err.body.contains(CONTEXT_LENGTH_EXCEEDED),
    };
    if exceeded {
        Retry::TruncateAndRetry
    } else {
        Retry::Fatal
    }
}

/// A successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The accepted response.
    pub response: ChatResponse,
    /// Attempts used, including the successful one.
    pub attempts: usize,
}

/// Why a submission produced no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Every attempt hit the context limit.
    Exhausted {
        /// Attempts made.
        attempts: usize,
        /// Error from the final attempt.
        last: ApiError,
    },
    /// A non-retryable failure ended the loop.
    Fatal {
        /// Attempts made, including the failing one.
        attempts: usize,
        /// The failure.
        error: ApiError,
    },
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted { attempts, last } => {
                write!(f, "still over the context limit after {attempts} attempts: {last}")
            }
            Self::Fatal { attempts, error } => write!(f, "attempt {attempts} failed: {error}"),
        }
    }
}

/// Submits `request`, shortening the last user message after each
/// context-length failure, for at most `policy.max_attempts` attempts.
///
/// # Errors
///
/// Returns [`SubmitError::Fatal`] on the first non-retryable failure and
/// [`SubmitError::Exhausted`] when every attempt hit the context limit.
pub async fn submit_with_retry(
    llm: &dyn LlmClient,
    mut request: ChatRequest,
    policy: RetryPolicy,
) -> Result<Submission, SubmitError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let err = match llm.complete(&request).await {
            Ok(response) => return Ok(Submission { response, attempts: attempt }),
            Err(err) => err,
        };

        match classify(&err) {
            Retry::Fatal => return Err(SubmitError::Fatal { attempts: attempt, error: err }),
            Retry::TruncateAndRetry if attempt >= policy.max_attempts => {
                return Err(SubmitError::Exhausted { attempts: attempt, last: err });
            }
            Retry::TruncateAndRetry => {
                let remaining = truncate_user_message(&mut request, policy.truncate_chars);
                tracing::info!(
                    attempt = attempt + 1,
                    chars = remaining,
                    "prompt exceeded context window, retrying shorter"
                );
            }
        }
    }
}

/// Drops the trailing `n` characters of the last user message and returns
/// its new length in characters.
fn truncate_user_message(request: &mut ChatRequest, n: usize) -> usize {
    let Some(message) = request.messages.iter_mut().rev().find(|m| m.role == "user") else {
        return 0;
    };
    let keep = message.content.chars().count().saturating_sub(n);
    let cut = message.content.char_indices().nth(keep).map_or(message.content.len(), |(i, _)| i);
    message.content.truncate(cut);
    keep
}
