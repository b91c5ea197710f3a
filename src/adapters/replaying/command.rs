//! Replaying adapter for the `CommandRunner` port.

use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::adapters::recording::command::{method_name, COMMAND_PORT};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::command::{CommandOutput, CommandRunner, Invocation};

/// Replays recorded command results from a cassette.
///
/// Interactions are matched by git subcommand. When the recorded input
/// carries an argument list it must equal the invoked one, so a cassette
/// recorded for one tag prefix never answers a query for another.
pub struct ReplayingCommandRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingCommandRunner {
    /// Creates a new replaying runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl CommandRunner for ReplayingCommandRunner {
    fn execute(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        let (input, output) = {
            let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
            let interaction = replayer.next_interaction(COMMAND_PORT, method_name(invocation))?;
            (interaction.input.clone(), interaction.output.clone())
        };
        check_args(&input, invocation)?;
        if let Some(err) = output.get("err") {
            let msg = err.as_str().unwrap_or("unknown error").to_string();
            return Err(msg.into());
        }
        let value = output.get("ok").unwrap_or(&output);
        serde_json::from_value(value.clone()).map_err(|e| {
            format!("{}: malformed recorded output: {e}", invocation.display()).into()
        })
    }
}

fn check_args(input: &Value, invocation: &Invocation) -> Result<(), String> {
    let Some(recorded) = input.get("args") else {
        return Ok(());
    };
    if *recorded == serde_json::json!(invocation.args) {
        return Ok(());
    }
    Err(format!(
        "{}: recorded args {recorded}, invoked with {:?}",
        invocation.display(),
        invocation.args
    ))
}
