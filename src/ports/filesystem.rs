//! Filesystem port for repository discovery.

use std::path::Path;

/// Provides the filesystem queries needed to locate a repository.
///
/// Only existence checks are required; metadata contents are never read.
pub trait FileSystem: Send + Sync {
    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;
}
