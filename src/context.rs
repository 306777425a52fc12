//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::llm::{LiveLlmClient, UnconfiguredLlmClient};
use crate::adapters::recording::{RecordingClock, RecordingLlmClient};
use crate::adapters::replaying::{ReplayingClock, ReplayingLlmClient};
use crate::cassette::format::Cassette;
use crate::cassette::session::RecordingSession;
use crate::config::ApiConfig;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::LlmClient;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for tree walks and artifact I/O.
    pub fs: Box<dyn FileSystem>,
    /// Chat-completion client used by the summarizer.
    pub llm: Box<dyn LlmClient>,
}

impl ServiceContext {
    /// Creates a live context.
    ///
    /// Without an [`ApiConfig`] the LLM port fails every call, which is
    /// fine for commands that never reach the network.
    #[must_use]
    pub fn live(api: Option<ApiConfig>) -> Self {
        Self { clock: Box::new(LiveClock), fs: Box::new(LiveFileSystem), llm: live_llm(api) }
    }

    /// Creates a recording context that captures clock and LLM interactions
    /// into a new session under `base`.
    ///
    /// The context must be dropped before [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(
        base: &Path,
        root: &Path,
        api: Option<ApiConfig>,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base, root)?;
        let ctx = Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            fs: Box::new(LiveFileSystem),
            llm: Box::new(RecordingLlmClient::new(live_llm(api), Arc::clone(&session.llm))),
        };
        Ok((ctx, session))
    }

    /// Creates a context whose clock and LLM are served from a cassette.
    ///
    /// The filesystem stays live: replays run against real fixture trees.
    /// A single cassette may hold both ports; each reads only its own entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::replaying_cassette(&cassette))
    }

    /// Creates a replaying context from an in-memory cassette.
    #[must_use]
    pub fn replaying_cassette(cassette: &Cassette) -> Self {
        Self {
            clock: Box::new(ReplayingClock::new(cassette)),
            fs: Box::new(LiveFileSystem),
            llm: Box::new(ReplayingLlmClient::new(cassette)),
        }
    }
}

fn live_llm(api: Option<ApiConfig>) -> Box<dyn LlmClient> {
    match api {
        Some(config) => Box::new(LiveLlmClient::new(config)),
        None => Box::new(UnconfiguredLlmClient),
    }
}
