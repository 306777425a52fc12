//! Recording adapter for the `Clock` port.

use chrono::{DateTime, Utc};

use super::capture;
use crate::cassette::session::SharedRecorder;
use crate::ports::Clock;

/// Reads an inner clock and captures every reading.
pub struct RecordingClock {
    inner: Box<dyn Clock>,
    recorder: SharedRecorder,
}

impl RecordingClock {
    /// Wraps `inner`, capturing into `recorder`.
    pub fn new(inner: Box<dyn Clock>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> DateTime<Utc> {
        let reading = self.inner.now();
        capture(&self.recorder, |r| r.record(&(), &reading));
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::clock::LiveClock;
    use crate::adapters::replaying::ReplayingClock;
    use crate::cassette::format::{Cassette, Port};
    use crate::cassette::recorder::CassetteRecorder;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    #[test]
    fn recorded_reading_replays_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("clock.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            &path,
            Port::Clock,
            "clock",
            Path::new("/t"),
        )));

        let live = RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder)).now();

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();
        let replayed = ReplayingClock::new(&Cassette::load(&path).unwrap()).now();
        assert_eq!(replayed, live);
    }
}
