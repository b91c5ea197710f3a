//! Upward search for the repository root.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, VersionError};
use crate::ports::filesystem::FileSystem;

/// Name of the version-control metadata entry that marks a repository root.
pub const METADATA_DIR: &str = ".git";

/// Absolute path of a directory that directly contains [`METADATA_DIR`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRoot(PathBuf);

impl RepositoryRoot {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self(path)
    }

    /// The worktree directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// The metadata entry inside the worktree.
    #[must_use]
    pub fn metadata_dir(&self) -> PathBuf {
        self.0.join(METADATA_DIR)
    }
}

impl fmt::Display for RepositoryRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Finds the repository root for a directory by walking up its ancestors.
pub struct RepositoryLocator<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> RepositoryLocator<'a> {
    /// Creates a locator that checks existence through `fs`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Returns the nearest directory at or above `start` containing `.git`.
    ///
    /// `start` is made absolute against the current directory and `.`/`..`
    /// components are folded away lexically, so equivalent spellings of a
    /// directory share one root. Only existence is checked; `.git` may be a
    /// directory or a gitdir file.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::RepositoryNotFound`] once the filesystem root
    /// has been checked without a match, or [`VersionError::Io`] if `start`
    /// cannot be made absolute.
    pub fn locate(&self, start: &Path) -> Result<RepositoryRoot> {
        let start = std::path::absolute(start).map_err(|source| VersionError::Io {
            path: start.to_path_buf(),
            source,
        })?;
        let start = normalize(&start);

        let mut current = start.as_path();
        loop {
            if self.fs.exists(&current.join(METADATA_DIR)) {
                tracing::debug!(root = %current.display(), "found repository root");
                return Ok(RepositoryRoot::new(current.to_path_buf()));
            }
            match current.parent() {
                Some(parent) if parent != current => current = parent,
                _ => return Err(VersionError::RepositoryNotFound(start.clone())),
            }
        }
    }
}

/// Removes `.` and `..` components without touching the filesystem.
///
/// Symlinks are not resolved, so `link/..` folds to the directory holding
/// `link` rather than the link target's parent.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
