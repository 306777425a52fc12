//! Collects one port's calls during a recorded run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::format::{encode_result, Cassette, Port};

/// Captures the calls made to a single port and writes them as one
/// cassette file when the run ends.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    port: Port,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Starts an empty recording for `port`, to be written to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, port: Port, name: impl Into<String>, root: &Path) -> Self {
        Self {
            path: path.into(),
            port,
            cassette: Cassette::new(name, root.display().to_string()),
        }
    }

    /// Records a call whose output is a plain value.
    ///
    /// # Errors
    ///
    /// Returns an error if the input or output cannot be serialized.
    pub fn record<I, O>(&mut self, input: &I, output: &O) -> Result<(), String>
    where
        I: Serialize,
        O: Serialize,
    {
        let output = serde_json::to_value(output)
            .map_err(|e| format!("failed to encode {} output: {e}", self.port))?;
        self.push(input, output)
    }

    /// Records a call that returned a `Result`, keeping the error's
    /// structure so a replay reproduces it exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the input or result cannot be serialized.
    pub fn record_result<I, T, E>(&mut self, input: &I, result: &Result<T, E>) -> Result<(), String>
    where
        I: Serialize,
        T: Serialize,
        E: Serialize,
    {
        let output = encode_result(result)?;
        self.push(input, output)
    }

    fn push<I: Serialize>(&mut self, input: &I, output: serde_json::Value) -> Result<(), String> {
        let input = serde_json::to_value(input)
            .map_err(|e| format!("failed to encode {} input: {e}", self.port))?;
        self.cassette.push(self.port, input, output);
        Ok(())
    }

    /// Writes the cassette and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(mut self) -> Result<PathBuf, String> {
        self.cassette.recorded_at = chrono::Utc::now();
        self.cassette.save(&self.path)?;
        Ok(self.path)
    }
}
