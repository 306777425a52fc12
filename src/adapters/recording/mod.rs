//! Adapters that pass calls through to a live port and capture them.

pub mod clock;
pub mod llm;

use std::sync::PoisonError;

use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::session::SharedRecorder;

pub use clock::RecordingClock;
pub use llm::RecordingLlmClient;

/// Applies `record` to the shared recorder.
///
/// A call that cannot be captured is logged and the live result still goes
/// back to the caller; recording never changes what a command does.
pub(crate) fn capture<F>(recorder: &SharedRecorder, record: F)
where
    F: FnOnce(&mut CassetteRecorder) -> Result<(), String>,
{
    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(e) = record(&mut guard) {
        tracing::warn!("call not recorded: {e}");
    }
}
