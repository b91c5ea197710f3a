//! Live command runner using `std::process::Command`.

use std::process::{Command, Stdio};

use crate::ports::command::{CommandOutput, CommandRunner, Invocation};

/// Live command runner that spawns real processes.
///
/// stderr is discarded; callers only ever interpret stdout and the exit code.
pub struct LiveCommandRunner;

impl CommandRunner for LiveCommandRunner {
    fn execute(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| format!("failed to run {}: {e}", invocation.display()))?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
