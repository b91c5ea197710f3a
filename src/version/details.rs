//! The resolved, immutable version of a repository.

use serde::{Deserialize, Serialize};

/// Version string returned when HEAD cannot be described at all.
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Suffix appended to the version of a working tree with uncommitted changes.
pub const DIRTY_SUFFIX: &str = ".dirty";

/// Everything known about the version of a repository at one point in time.
///
/// Instances are built once per repository and prefix, then shared
/// read-only between all callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDetails {
    /// The version string, e.g. `1.2.0`, `1.2.0.3.gabc1234.dirty`, or `unspecified`.
    pub version: String,
    /// The checked-out branch, absent on detached HEAD or an empty repository.
    pub branch: Option<String>,
    /// Full object id of HEAD.
    pub full_hash: Option<String>,
    /// Abbreviated object id of HEAD as printed by `git describe`.
    pub abbreviated_hash: Option<String>,
    /// Commits between the matched tag and HEAD along first-parent history.
    pub commit_distance: Option<u32>,
    /// HEAD is exactly a matching tag and the working tree is clean.
    pub is_clean_tag: bool,
    /// Working-tree cleanliness, absent when it could not be determined.
    pub is_clean: Option<bool>,
}

impl VersionDetails {
    /// Details for a repository git could not describe.
    #[must_use]
    pub fn unspecified() -> Self {
        Self {
            version: UNSPECIFIED_VERSION.to_string(),
            branch: None,
            full_hash: None,
            abbreviated_hash: None,
            commit_distance: None,
            is_clean_tag: false,
            is_clean: None,
        }
    }

    /// Returns `true` if the working tree was known to have uncommitted changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.is_clean == Some(false)
    }
}
