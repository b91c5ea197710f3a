//! Recording adapter for the `CommandRunner` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::command::{CommandOutput, CommandRunner, Invocation};

/// Port name used for command interactions in cassettes.
pub const COMMAND_PORT: &str = "command";

/// Cassette method name for an invocation: its first argument (the git
/// subcommand), or the program name when there are no arguments.
#[must_use]
pub fn method_name(invocation: &Invocation) -> &str {
    match invocation.args.first() {
        Some(subcommand) => subcommand,
        None => &invocation.program,
    }
}

/// Records command interactions while delegating to an inner runner.
pub struct RecordingCommandRunner {
    inner: Arc<dyn CommandRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingCommandRunner {
    /// Creates a new recording runner wrapping the given implementation.
    pub fn new(inner: Arc<dyn CommandRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn execute(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.execute(invocation);
        record_result(
            &self.recorder,
            COMMAND_PORT,
            method_name(invocation),
            invocation,
            &result,
        );
        result
    }
}
