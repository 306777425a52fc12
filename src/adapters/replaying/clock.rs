//! Replaying adapter for the `Clock` port.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::cassette::format::{Cassette, Port};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;

/// Returns the clock readings a cassette captured, one per call.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Serves the clock entries of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self { replayer: Mutex::new(CassetteReplayer::new(cassette, Port::Clock)) }
    }
}

impl Clock for ReplayingClock {
    /// # Panics
    ///
    /// Panics when the cassette is out of clock entries or holds something
    /// other than a timestamp.
    fn now(&self) -> DateTime<Utc> {
        let output = self.replayer.lock().unwrap_or_else(PoisonError::into_inner).next_output();
        serde_json::from_value(output.clone())
            .unwrap_or_else(|e| panic!("clock entry {output} is not a timestamp: {e}"))
    }
}
