//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Raised when a replay asks for an interaction the cassette cannot serve.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// The cassette never recorded this port/method pair.
    #[error(
        "cassette exhausted: no interactions recorded for port={port:?} method={method:?}; \
         available port::method pairs: [{available}]"
    )]
    NotRecorded {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Comma-separated list of recorded pairs.
        available: String,
    },
    /// Every recorded interaction for this pair has already been served.
    #[error(
        "cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
         have been consumed"
    )]
    Consumed {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// How many interactions were recorded for the pair.
        count: usize,
    },
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
///
/// Ordering is only enforced within a pair, so interleaving between different
/// git subcommands may differ from the recording.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] when the cassette has no (more) interactions for
    /// the pair, describing what was requested versus what was recorded.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<&Interaction, ReplayError> {
        let key = PortMethodKey {
            port: port.to_string(),
            method: method.to_string(),
        };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> = self
                .queues
                .keys()
                .map(|k| format!("{}::{}", k.port, k.method))
                .collect();
            available.sort();
            return Err(ReplayError::NotRecorded {
                port: port.to_string(),
                method: method.to_string(),
                available: available.join(", "),
            });
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let Some(interaction) = queue.get(*cursor) else {
            return Err(ReplayError::Consumed {
                port: port.to_string(),
                method: method.to_string(),
                count: queue.len(),
            });
        };
        *cursor += 1;
        Ok(interaction)
    }

    /// Number of interactions not yet served, across all pairs.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues
            .iter()
            .map(|(key, queue)| queue.len() - self.cursors.get(key).copied().unwrap_or(0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str, stdout: &str) -> Interaction {
        Interaction {
            seq,
            port: "command".into(),
            method: method.into(),
            input: json!({}),
            output: json!({"ok": {"exit_code": 0, "stdout": stdout}}),
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            root: "/repo".into(),
            interactions,
        }
    }

    fn next(replayer: &mut CassetteReplayer, method: &str) -> Result<u64, ReplayError> {
        replayer.next_interaction("command", method).map(|i| i.seq)
    }

    #[test]
    fn serves_each_method_in_recorded_order() {
        let cassette = make_cassette(vec![
            interaction(0, "rev-parse", "1111111111111111111111111111111111111111"),
            interaction(1, "status", ""),
            interaction(2, "rev-parse", "2222222222222222222222222222222222222222"),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining(), 3);

        // Asking for status first does not disturb the rev-parse queue.
        assert_eq!(next(&mut replayer, "status"), Ok(1));
        assert_eq!(next(&mut replayer, "rev-parse"), Ok(0));
        assert_eq!(next(&mut replayer, "rev-parse"), Ok(2));
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn exhausted_pair_reports_consumed_count() {
        let cassette = make_cassette(vec![interaction(0, "describe", "v1.0.0-0-gabc1234")]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(next(&mut replayer, "describe"), Ok(0));
        let err = next(&mut replayer, "describe").unwrap_err();
        assert!(matches!(err, ReplayError::Consumed { count: 1, .. }));
        assert!(err.to_string().contains("cassette exhausted"));
    }

    #[test]
    fn unknown_pair_lists_what_was_recorded() {
        let cassette = make_cassette(vec![interaction(0, "status", "")]);
        let mut replayer = CassetteReplayer::new(&cassette);

        let err = next(&mut replayer, "describe").unwrap_err();
        assert!(err.to_string().contains("no interactions recorded"));
        assert!(err.to_string().contains("command::status"));
    }
}
