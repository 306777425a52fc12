//! Summarizer: submits prompt files to the chat-completion service and
//! stores the responses next to them.

pub mod normalize;
pub mod retry;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::artifact::{PROMPT_FILE, RESULT_FILE, SKIP_DIRS};
use crate::context::ServiceContext;
use crate::ports::llm::{ChatMessage, ChatRequest};

use self::normalize::normalize;
use self::retry::{submit_with_retry, RetryPolicy};

/// Instruction sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str = "You are to generate a detailed bulleted list summarizing the probable purpose of this app based on the information given.";

/// Builds the two-message request for one prompt file's contents.
#[must_use]
pub fn build_request(prompt: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage { role: "system".into(), content: SYSTEM_PROMPT.into() },
            ChatMessage { role: "user".into(), content: normalize(prompt) },
        ],
    }
}

/// Result of summarizing one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// A result file was written at this path.
    Written(PathBuf),
    /// A result file existed before the run started.
    AlreadySummarized,
    /// The directory has no prompt file.
    NoPrompt,
    /// No result was written; the directory stays pending.
    Failed(String),
}

/// Aggregate of one summarize run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarizeReport {
    /// Directories visited.
    pub visited: usize,
    /// Result files written, in walk order.
    pub written: Vec<PathBuf>,
    /// Directories skipped because they were already summarized.
    pub already_summarized: usize,
    /// Directories visited that hold no prompt file.
    pub no_prompt: usize,
    /// Directories with a prompt that did not get a result.
    pub failed: Vec<(PathBuf, String)>,
}

impl SummarizeReport {
    fn add(&mut self, dir: &Path, outcome: SummaryOutcome) {
        self.visited += 1;
        match outcome {
            SummaryOutcome::Written(path) => self.written.push(path),
            SummaryOutcome::AlreadySummarized => self.already_summarized += 1,
            SummaryOutcome::NoPrompt => self.no_prompt += 1,
            SummaryOutcome::Failed(reason) => self.failed.push((dir.to_path_buf(), reason)),
        }
    }
}

/// Drives prompt submission over a tree.
pub struct Summarizer<'a> {
    ctx: &'a ServiceContext,
    policy: RetryPolicy,
}

impl<'a> Summarizer<'a> {
    /// Creates a summarizer with the default retry policy.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self::with_policy(ctx, RetryPolicy::default())
    }

    /// Creates a summarizer with a custom retry policy.
    #[must_use]
    pub fn with_policy(ctx: &'a ServiceContext, policy: RetryPolicy) -> Self {
        Self { ctx, policy }
    }

    /// Returns the directories among `dirs` that already hold a result file.
    #[must_use]
    pub fn find_completed(&self, dirs: &[PathBuf]) -> BTreeSet<PathBuf> {
        dirs.iter().filter(|dir| self.ctx.fs.exists(&dir.join(RESULT_FILE))).cloned().collect()
    }

    /// Summarizes every pending directory under `root`, one at a time.
    ///
    /// # Errors
    ///
    /// Returns an error only if `root` itself cannot be walked.
    pub async fn summarize_tree(&self, root: &Path) -> Result<SummarizeReport, String> {
        let dirs = self
            .ctx
            .fs
            .walk_dirs(root, SKIP_DIRS)
            .map_err(|e| format!("failed to walk {}: {e}", root.display()))?;
        let completed = self.find_completed(&dirs);
        tracing::debug!(count = completed.len(), "directories already summarized");

        let mut report = SummarizeReport::default();
        for dir in dirs {
            let outcome = if completed.contains(&dir) {
                SummaryOutcome::AlreadySummarized
            } else {
                self.summarize_directory(&dir).await
            };
            match &outcome {
                SummaryOutcome::Written(path) => tracing::info!("wrote {}", path.display()),
                SummaryOutcome::AlreadySummarized => {
                    tracing::debug!("already summarized: {}", dir.display());
                }
                SummaryOutcome::NoPrompt => {}
                SummaryOutcome::Failed(reason) => {
                    tracing::warn!("no summary for {}: {reason}", dir.display());
                }
            }
            report.add(&dir, outcome);
        }
        Ok(report)
    }

    /// Submits one directory's prompt file and writes the result file.
    ///
    /// Does not check for an existing result; [`Self::summarize_tree`]
    /// filters those out before any submission.
    pub async fn summarize_directory(&self, dir: &Path) -> SummaryOutcome {
        let prompt_path = dir.join(PROMPT_FILE);
        if !self.ctx.fs.exists(&prompt_path) {
            return SummaryOutcome::NoPrompt;
        }
        let prompt = match self.ctx.fs.read_to_string(&prompt_path) {
            Ok(prompt) => prompt,
            Err(e) => return SummaryOutcome::Failed(format!("failed to read prompt: {e}")),
        };

        tracing::info!("submitting {}", prompt_path.display());
        let submission =
            match submit_with_retry(self.ctx.llm.as_ref(), build_request(&prompt), self.policy)
                .await
            {
                Ok(submission) => submission,
                Err(e) => return SummaryOutcome::Failed(e.to_string()),
            };
        if let Some(summary) = submission.response.summary() {
            tracing::info!(attempts = submission.attempts, "summary for {}:\n{summary}", dir.display());
        }

        let rendered = match render_envelope(&submission.response.envelope) {
            Ok(rendered) => rendered,
            Err(e) => return SummaryOutcome::Failed(e),
        };
        let result_path = dir.join(RESULT_FILE);
        match self.ctx.fs.write(&result_path, &rendered) {
            Ok(()) => SummaryOutcome::Written(result_path),
            Err(e) => SummaryOutcome::Failed(format!("failed to write result: {e}")),
        }
    }
}

/// Pretty-prints a response envelope with a four-space indent.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn render_envelope(envelope: &serde_json::Value) -> Result<String, String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    envelope.serialize(&mut ser).map_err(|e| format!("failed to serialize response: {e}"))?;
    String::from_utf8(buf).map_err(|e| format!("response is not valid UTF-8: {e}"))
}
