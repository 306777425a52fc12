//! On-disk cassette layout and the encoding of recorded port results.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A port whose calls are captured in cassettes.
///
/// Each port has exactly one recorded operation: `Clock::now` and
/// `LlmClient::complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Port {
    /// The clock; outputs are RFC 3339 timestamps.
    Clock,
    /// The chat-completion client; outputs are encoded results.
    Llm,
}

impl Port {
    /// File-name stem and display name of the port.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Llm => "llm",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One recorded call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the cassette, starting at zero.
    pub seq: u64,
    /// Port that was called.
    pub port: Port,
    /// What the caller passed in.
    pub input: serde_json::Value,
    /// What the port returned.
    pub output: serde_json::Value,
}

/// A recorded run: every captured call, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Label for the recording.
    pub name: String,
    /// When the cassette was written.
    pub recorded_at: DateTime<Utc>,
    /// Tree the recorded command ran against.
    pub root: String,
    /// Captured calls.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// An empty cassette stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recorded_at: Utc::now(),
            root: root.into(),
            interactions: Vec::new(),
        }
    }

    /// Appends a call, numbering it after the ones already held.
    pub fn push(&mut self, port: Port, input: serde_json::Value, output: serde_json::Value) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction { seq, port, input, output });
    }

    /// Outputs recorded for `port`, in call order.
    pub fn outputs(&self, port: Port) -> impl Iterator<Item = &serde_json::Value> + '_ {
        self.interactions.iter().filter(move |i| i.port == port).map(|i| &i.output)
    }

    /// Reads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read cassette {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("failed to parse cassette {}: {e}", path.display()))
    }

    /// Writes the cassette as YAML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| format!("failed to serialize cassette {}: {e}", self.name))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
        }
        std::fs::write(path, yaml)
            .map_err(|e| format!("failed to write cassette {}: {e}", path.display()))
    }
}

/// Encodes a port result as `{"Ok": value}` or `{"Err": error}`.
///
/// # Errors
///
/// Returns an error if either side fails to serialize.
pub fn encode_result<T, E>(result: &Result<T, E>) -> Result<serde_json::Value, String>
where
    T: Serialize,
    E: Serialize,
{
    let (tag, value) = match result {
        Ok(v) => ("Ok", serde_json::to_value(v)),
        Err(e) => ("Err", serde_json::to_value(e)),
    };
    let value = value.map_err(|e| format!("failed to encode {tag} value: {e}"))?;
    let mut tagged = serde_json::Map::new();
    tagged.insert(tag.to_string(), value);
    Ok(serde_json::Value::Object(tagged))
}

/// Decodes an output written by [`encode_result`].
///
/// # Errors
///
/// Returns an error if the output has neither tag or its payload does not
/// match the expected type.
pub fn decode_result<T, E>(output: serde_json::Value) -> Result<Result<T, E>, String>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    let mut map = match output {
        serde_json::Value::Object(map) => map,
        other => return Err(format!("expected an Ok/Err object, got {other}")),
    };
    if let Some(err) = map.remove("Err") {
        return serde_json::from_value(err)
            .map(Err)
            .map_err(|e| format!("malformed Err value: {e}"));
    }
    let ok = map.remove("Ok").ok_or("output has neither Ok nor Err")?;
    serde_json::from_value(ok).map(Ok).map_err(|e| format!("malformed Ok value: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_then_load_keeps_ports_and_numbering() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/run.cassette.yaml");
        let mut cassette = Cassette::new("summarize-run", "/projects");
        cassette.push(Port::Clock, json!(null), json!("2024-06-15T10:30:00Z"));
        cassette.push(
            Port::Llm,
            json!({"messages": []}),
            json!({"Err": {"status": 500, "body": "boom"}}),
        );

        cassette.save(&path).unwrap();
        let loaded = Cassette::load(&path).unwrap();

        assert_eq!(loaded, cassette);
        assert_eq!(loaded.interactions[1].seq, 1);
        let yaml = std::fs::read_to_string(&path).unwrap();
        assert!(yaml.contains("port: llm"));
    }

    #[test]
    fn outputs_are_filtered_by_port() {
        let mut cassette = Cassette::new("t", "/t");
        cassette.push(Port::Llm, json!({}), json!(1));
        cassette.push(Port::Clock, json!(null), json!(2));
        cassette.push(Port::Llm, json!({}), json!(3));

        let llm: Vec<_> = cassette.outputs(Port::Llm).cloned().collect();
        assert_eq!(llm, vec![json!(1), json!(3)]);
    }

    #[test]
    fn load_reports_parse_failures_with_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.yaml");
        std::fs::write(&path, "interactions: [").unwrap();

        let err = Cassette::load(&path).unwrap_err();
        assert!(err.contains("broken.yaml"));
    }

    #[test]
    fn results_keep_their_side() {
        let ok: Result<u32, String> = Ok(7);
        let err: Result<u32, String> = Err("nope".into());

        assert_eq!(encode_result(&ok).unwrap(), json!({"Ok": 7}));
        assert_eq!(decode_result::<u32, String>(encode_result(&err).unwrap()).unwrap(), err);
    }

    #[test]
    fn untagged_output_is_rejected() {
        let err = decode_result::<u32, String>(json!({"value": 1})).unwrap_err();
        assert!(err.contains("neither Ok nor Err"));
        assert!(decode_result::<u32, String>(json!([1])).is_err());
    }
}
