//! Error types for version resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while resolving a version.
///
/// Individual git commands failing is not an error: those answers are
/// recorded as absent and flow into [`crate::version::VersionDetails`].
#[derive(Debug, Error)]
pub enum VersionError {
    /// The git executable could not be invoked at all.
    #[error("git not found: could not invoke `git version` in {0}")]
    GitUnavailable(PathBuf),

    /// No `.git` entry exists in the start directory or any of its parents.
    #[error("cannot find '.git' directory in {0} or any parent directory")]
    RepositoryNotFound(PathBuf),

    /// The configured tag prefix cannot be used as a describe match pattern.
    #[error("invalid tag prefix `{prefix}`: {reason}")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The start directory could not be turned into an absolute path.
    #[error("failed to resolve {path}: {source}")]
    Io {
        /// The path being resolved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for version resolution.
pub type Result<T> = std::result::Result<T, VersionError>;
