//! Adapters that answer port calls from a cassette.

pub mod clock;
pub mod llm;

pub use clock::ReplayingClock;
pub use llm::ReplayingLlmClient;
