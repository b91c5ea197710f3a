//! Scripted command runner shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::ports::command::{CommandOutput, CommandRunner, Invocation};

pub(crate) const DESCRIBE_ALL: &str =
    "describe --tags --always --first-parent --long --abbrev=7 --match=* HEAD";

/// Answers git invocations from a table keyed by the joined argument list.
///
/// Unscripted invocations exit with status 1. Every call is counted.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    answers: HashMap<String, CommandOutput>,
    unspawnable: bool,
    calls: Mutex<Vec<Invocation>>,
    total: AtomicUsize,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default().ok("version", "git version 2.43.0")
    }

    /// A runner whose every invocation fails to spawn, as if git were absent.
    pub(crate) fn unspawnable() -> Self {
        Self {
            unspawnable: true,
            ..Self::default()
        }
    }

    pub(crate) fn ok(mut self, args: &str, stdout: &str) -> Self {
        let output = exited(0, format!("{stdout}\n"));
        self.answers.insert(args.to_string(), output);
        self
    }

    pub(crate) fn fail(mut self, args: &str, exit_code: i32) -> Self {
        let output = exited(exit_code, String::new());
        self.answers.insert(args.to_string(), output);
        self
    }

    /// A clean repository at `hash` on `main` whose describe prints `describe`.
    pub(crate) fn repository(describe: &str, hash: &str) -> Self {
        Self::new()
            .ok("branch --show-current", "main")
            .ok("rev-parse HEAD", hash)
            .ok("status --porcelain", "")
            .ok(DESCRIBE_ALL, describe)
    }

    pub(crate) fn calls_to(&self, args: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|inv| inv.args.join(" ") == args)
            .count()
    }

    pub(crate) fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl CommandRunner for ScriptedRunner {
    fn execute(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        self.total.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(invocation.clone());
        if self.unspawnable {
            return Err("No such file or directory (os error 2)".into());
        }
        let key = invocation.args.join(" ");
        let output = self.answers.get(&key).cloned();
        Ok(output.unwrap_or_else(|| exited(1, String::new())))
    }
}

fn exited(exit_code: i32, stdout: String) -> CommandOutput {
    CommandOutput { exit_code, stdout }
}
