//! The git questions version resolution asks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Result, VersionError};
use crate::ports::command::{capture, Answer, CommandRunner, Invocation};
use crate::version::locator::RepositoryRoot;
use crate::version::prefix::TagPrefix;

const GIT: &str = "git";

const PLACEHOLDER_EMAIL: &str = "email@example.com";
const PLACEHOLDER_NAME: &str = "name";

/// Working-tree state as reported by `git status --porcelain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cleanliness {
    /// No staged, unstaged, or untracked changes.
    Clean,
    /// At least one change relative to HEAD.
    Dirty,
    /// The status command failed.
    Unknown,
}

impl Cleanliness {
    /// `Some(true)` for clean, `Some(false)` for dirty, `None` when unknown.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Clean => Some(true),
            Self::Dirty => Some(false),
            Self::Unknown => None,
        }
    }
}

/// Runs git introspection commands inside one worktree.
///
/// Every query degrades to an absent answer when its command fails; only
/// construction can fail, and only when git itself cannot be run.
pub struct GitInspector {
    runner: Arc<dyn CommandRunner>,
    worktree: PathBuf,
    env: BTreeMap<String, String>,
}

impl GitInspector {
    /// Creates an inspector for `root`, verifying that `git` can be invoked.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::GitUnavailable`] if `git version` cannot be
    /// spawned or exits unsuccessfully.
    pub fn new(runner: Arc<dyn CommandRunner>, root: &RepositoryRoot) -> Result<Self> {
        let inspector = Self {
            runner,
            worktree: root.path().to_path_buf(),
            env: BTreeMap::new(),
        };
        inspector.ensure_git_available()?;
        Ok(inspector)
    }

    /// Like [`GitInspector::new`], but also makes sure an author identity is
    /// configured so tests can commit and tag in throwaway repositories.
    ///
    /// The placeholder identity is written to the repository's local config.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::GitUnavailable`] if `git version` fails.
    pub fn for_testing(runner: Arc<dyn CommandRunner>, root: &RepositoryRoot) -> Result<Self> {
        let inspector = Self::new(runner, root)?;
        inspector.ensure_identity();
        Ok(inspector)
    }

    /// Sets an environment variable on every git invocation.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The worktree this inspector runs in.
    #[must_use]
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    /// The checked-out branch; `None` on detached HEAD or failure.
    #[must_use]
    pub fn current_branch(&self) -> Option<String> {
        self.git(&["branch", "--show-current"]).into_option()
    }

    /// The full object id of HEAD; `None` when there are no commits.
    #[must_use]
    pub fn current_full_hash(&self) -> Option<String> {
        self.git(&["rev-parse", "HEAD"])
            .into_option()
            .filter(|hash| hash.chars().all(|c| c.is_ascii_hexdigit()))
    }

    /// Whether the working tree has uncommitted changes.
    #[must_use]
    pub fn cleanliness(&self) -> Cleanliness {
        match self.git(&["status", "--porcelain"]) {
            Answer::Empty => Cleanliness::Clean,
            Answer::Output(_) => Cleanliness::Dirty,
            Answer::Failed => Cleanliness::Unknown,
        }
    }

    /// [`GitInspector::cleanliness`] as an optional boolean.
    #[must_use]
    pub fn is_clean(&self) -> Option<bool> {
        self.cleanliness().as_bool()
    }

    /// Describes HEAD relative to the nearest first-parent tag matching `prefix`.
    ///
    /// Output has the long form `<tag>-<N>-g<hash>`, or is a bare 7-character
    /// hash when no tag matches.
    #[must_use]
    pub fn describe(&self, prefix: &TagPrefix) -> Option<String> {
        let pattern = format!("--match={}", prefix.match_pattern());
        self.git(&[
            "describe",
            "--tags",
            "--always",
            "--first-parent",
            "--long",
            "--abbrev=7",
            &pattern,
            "HEAD",
        ])
        .into_option()
    }

    fn git(&self, args: &[&str]) -> Answer {
        let invocation = Invocation::new(GIT, args.iter().copied(), &self.worktree);
        let invocation = invocation.with_env(&self.env);
        let answer = capture(self.runner.as_ref(), &invocation);
        if answer == Answer::Empty {
            tracing::trace!(command = %invocation.display(), "command produced no output");
        }
        answer
    }

    fn ensure_git_available(&self) -> Result<()> {
        let invocation = Invocation::new(GIT, ["version"], &self.worktree).with_env(&self.env);
        match self.runner.execute(&invocation) {
            Ok(output) if output.success() => Ok(()),
            Ok(output) => {
                tracing::debug!(
                    exit_code = output.exit_code,
                    "git version exited unsuccessfully"
                );
                Err(VersionError::GitUnavailable(self.worktree.clone()))
            }
            Err(err) => {
                tracing::debug!(error = %err, "git command not found");
                Err(VersionError::GitUnavailable(self.worktree.clone()))
            }
        }
    }

    fn ensure_identity(&self) {
        if let Answer::Output(_) = self.git(&["config", "user.email"]) {
            return;
        }
        tracing::debug!(worktree = %self.worktree.display(), "setting placeholder git identity");
        let identity = [
            ("user.email", PLACEHOLDER_EMAIL),
            ("user.name", PLACEHOLDER_NAME),
        ];
        for (key, value) in identity {
            if self.git(&["config", key, value]) == Answer::Failed {
                tracing::debug!(key, "failed to set git identity");
            }
        }
    }
}
