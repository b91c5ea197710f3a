//! Tag prefix used to filter which tags count as version tags.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, VersionError};

/// A validated tag prefix; the empty prefix matches every tag.
///
/// The prefix is turned into a `git describe --match=<prefix>*` glob, so
/// glob metacharacters and whitespace are rejected up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TagPrefix(String);

impl TagPrefix {
    /// Validates and wraps a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidPrefix`] if the prefix contains glob
    /// metacharacters (`*`, `?`, `[`, `\`) or whitespace.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let reason = if prefix.contains(['*', '?', '[', '\\']) {
            Some("glob metacharacters are not allowed")
        } else if prefix.chars().any(char::is_whitespace) {
            Some("whitespace is not allowed")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(VersionError::InvalidPrefix { prefix, reason }),
            None => Ok(Self(prefix)),
        }
    }

    /// The raw prefix text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `--match` glob that selects tags starting with this prefix.
    #[must_use]
    pub fn match_pattern(&self) -> String {
        format!("{}*", self.0)
    }
}

impl fmt::Display for TagPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
