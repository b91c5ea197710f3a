//! Helpers for tests that drive a real `git` binary in throwaway repositories.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use gitversion::adapters::live::{LiveCommandRunner, LiveFileSystem};
use gitversion::cassette::recorder::CassetteRecorder;
use gitversion::version::{ResolutionCache, VersionService};
use serde_json::json;
use tempfile::TempDir;

/// Arguments of the describe call made for the empty prefix.
pub const DESCRIBE_ALL: &str =
    "describe --tags --always --first-parent --long --abbrev=7 --match=* HEAD";

/// Returns `true` if a working `git` is on `PATH`.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Records a successful git invocation in the shape the recording runner
/// writes; `args` is split on whitespace.
pub fn record_git(recorder: &mut CassetteRecorder, args: &str, stdout: &str) {
    let args: Vec<&str> = args.split_whitespace().collect();
    let input = json!({"program": "git", "args": args});
    let output = json!({"ok": {"exit_code": 0, "stdout": stdout}});
    recorder.record("command", args[0], input, output);
}

/// A temporary repository with `main` checked out and no commits.
pub struct Repo {
    dir: TempDir,
}

impl Repo {
    /// Initializes a repository. Panics when git is not installed.
    pub fn init() -> Self {
        assert!(
            git_available(),
            "a working `git` must be on PATH to run the real-repository tests"
        );
        let repo = Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Creates `relative` inside the worktree and returns its path.
    pub fn subdir(&self, relative: &str) -> PathBuf {
        let dir = self.path().join(relative);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Runs git with a fixed identity and signing disabled, returning trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=gitversion-tests",
                "-c",
                "user.email=tests@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Writes `contents` to `file` and commits it, returning the new HEAD hash.
    pub fn commit(&self, file: &str, contents: &str) -> String {
        let path = self.path().join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        self.git(&["add", "--all"]);
        self.git(&["commit", "-q", "-m", &format!("update {file}")]);
        self.head()
    }

    pub fn tag(&self, name: &str) {
        self.git(&["tag", name]);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    pub fn short_head(&self) -> String {
        self.git(&["rev-parse", "--short=7", "HEAD"])
    }

    /// Modifies a tracked file without committing.
    pub fn touch(&self, file: &str) {
        let path = self.path().join(file);
        let mut contents = std::fs::read_to_string(&path).unwrap_or_default();
        contents.push_str("changed\n");
        std::fs::write(path, contents).unwrap();
    }
}

/// A service backed by real git and a fresh cache.
pub fn live_service() -> VersionService {
    VersionService::new(
        Arc::new(LiveCommandRunner),
        Arc::new(LiveFileSystem),
        Arc::new(ResolutionCache::new()),
    )
}
