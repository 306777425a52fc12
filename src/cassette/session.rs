//! A recorded command run: one cassette per port in a timestamped folder.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::format::Port;
use super::recorder::CassetteRecorder;

/// Recorder handle shared between a recording adapter and its session.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Owns the recorders for a run started with `DIRSUM_RECORD=<base>`.
///
/// Files land in `<base>/<YYYY-MM-DDTHH-MM-SS>/{clock,llm}.cassette.yaml`.
pub struct RecordingSession {
    /// Recorder for chat completions.
    pub llm: SharedRecorder,
    /// Recorder for clock readings.
    pub clock: SharedRecorder,
    dir: PathBuf,
}

impl RecordingSession {
    /// Creates the session folder under `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if a session folder for this second already exists
    /// or the folder cannot be created.
    pub fn new(base: &Path, root: &Path) -> Result<Self, String> {
        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let dir = base.join(&stamp);
        if dir.exists() {
            return Err(format!("recording folder already exists: {}", dir.display()));
        }
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("failed to create recording folder {}: {e}", dir.display()))?;

        let recorder = |port: Port| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            let name = format!("{stamp}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(path, port, name, root)))
        };
        Ok(Self { llm: recorder(Port::Llm), clock: recorder(Port::Clock), dir })
    }

    /// Writes both cassettes and returns the session folder.
    ///
    /// The recording adapters must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a cassette
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        for (port, shared) in [(Port::Llm, self.llm), (Port::Clock, self.clock)] {
            let recorder = Arc::try_unwrap(shared)
                .map_err(|_| format!("{port} recorder is still in use"))?
                .into_inner()
                .map_err(|_| format!("{port} recorder lock poisoned"))?;
            recorder.finish()?;
        }
        Ok(self.dir)
    }
}
