//! Command runner port for executing external programs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Executable name or path (e.g. `"git"`).
    pub program: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Working directory the command runs in.
    pub cwd: PathBuf,
    /// Environment variables set on top of the inherited environment.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    /// Creates an invocation of `program` with `args` in `cwd`.
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
            env: BTreeMap::new(),
        }
    }

    /// Adds environment overrides to the invocation.
    #[must_use]
    pub fn with_env(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env.extend(env.clone());
        self
    }

    /// Renders the invocation as a shell-like command line for log output.
    #[must_use]
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// The result of running an external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
}

impl CommandOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes external commands.
///
/// Abstracting process execution allows resolution logic to be driven by
/// scripted or replayed answers instead of a real `git` binary.
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion and captures its stdout.
    ///
    /// Blocks the calling thread until the process exits. No timeout is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or its output read.
    fn execute(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>>;
}

/// What a command told us, with "failed" kept distinct from "said nothing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Exit status zero with non-blank output (trimmed).
    Output(String),
    /// Exit status zero with blank output.
    Empty,
    /// Non-zero exit status, or the process could not be run.
    Failed,
}

impl Answer {
    /// Returns the output text, treating empty and failed answers as absent.
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Output(text) => Some(text),
            Self::Empty | Self::Failed => None,
        }
    }
}

/// Runs `invocation` and classifies the outcome.
///
/// Failures are logged at debug level and never returned as errors.
pub fn capture(runner: &dyn CommandRunner, invocation: &Invocation) -> Answer {
    match runner.execute(invocation) {
        Ok(output) if output.success() => {
            let text = output.stdout.trim();
            if text.is_empty() {
                Answer::Empty
            } else {
                Answer::Output(text.to_string())
            }
        }
        Ok(output) => {
            tracing::debug!(
                command = %invocation.display(),
                exit_code = output.exit_code,
                "command exited unsuccessfully"
            );
            Answer::Failed
        }
        Err(err) => {
            tracing::debug!(command = %invocation.display(), error = %err, "command failed to run");
            Answer::Failed
        }
    }
}
