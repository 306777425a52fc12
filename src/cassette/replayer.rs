//! Hands back one port's recorded outputs in the order they were captured.

use std::collections::VecDeque;

use super::format::{Cassette, Port};

/// Replay cursor for a single port.
///
/// Ports are independent: calls to the clock never consume LLM entries and
/// vice versa, so one cassette can drive both.
#[derive(Debug)]
pub struct CassetteReplayer {
    port: Port,
    outputs: VecDeque<serde_json::Value>,
    served: usize,
}

impl CassetteReplayer {
    /// Queues every output `cassette` holds for `port`.
    #[must_use]
    pub fn new(cassette: &Cassette, port: Port) -> Self {
        Self { port, outputs: cassette.outputs(port).cloned().collect(), served: 0 }
    }

    /// Returns the next recorded output.
    ///
    /// # Panics
    ///
    /// Panics when the cassette has run out of entries for this port; the
    /// code under test made a call the recording never saw.
    pub fn next_output(&mut self) -> serde_json::Value {
        let Some(output) = self.outputs.pop_front() else {
            panic!(
                "cassette has no more {} interactions: {} served, call {} was not recorded",
                self.port,
                self.served,
                self.served + 1
            );
        };
        self.served += 1;
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cassette() -> Cassette {
        let mut cassette = Cassette::new("t", "/t");
        cassette.push(Port::Llm, json!({}), json!("first"));
        cassette.push(Port::Clock, json!(null), json!("2024-01-01T00:00:00Z"));
        cassette.push(Port::Llm, json!({}), json!("second"));
        cassette
    }

    #[test]
    fn serves_only_its_own_port_in_order() {
        let mut llm = CassetteReplayer::new(&cassette(), Port::Llm);
        assert_eq!(llm.next_output(), json!("first"));
        assert_eq!(llm.next_output(), json!("second"));

        let mut clock = CassetteReplayer::new(&cassette(), Port::Clock);
        assert_eq!(clock.next_output(), json!("2024-01-01T00:00:00Z"));
    }

    #[test]
    #[should_panic(expected = "no more clock interactions: 1 served")]
    fn panics_once_exhausted() {
        let mut clock = CassetteReplayer::new(&cassette(), Port::Clock);
        let _ = clock.next_output();
        let _ = clock.next_output();
    }
}
