//! Turns git's answers into a [`VersionDetails`].

use crate::version::details::{VersionDetails, DIRTY_SUFFIX};
use crate::version::inspector::{Cleanliness, GitInspector};
use crate::version::prefix::TagPrefix;
use crate::version::timer::Timer;

/// Parsed `git describe --long --always` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    /// `<tag>-<distance>-g<hash>`: HEAD is `distance` commits past `tag`.
    Tagged {
        /// The nearest matching tag.
        tag: String,
        /// Commits from the tag to HEAD.
        distance: u32,
        /// Abbreviated hash of HEAD.
        hash: String,
    },
    /// No tag matched; git printed HEAD's abbreviated hash (or something we
    /// could not parse, which is used verbatim).
    Untagged {
        /// The raw output.
        output: String,
    },
}

impl Description {
    /// Parses describe output. Anything not shaped like `<tag>-<N>-g<hex>` is
    /// [`Description::Untagged`]; parsing never fails.
    #[must_use]
    pub fn parse(output: &str) -> Self {
        Self::parse_tagged(output).unwrap_or_else(|| Self::Untagged {
            output: output.to_string(),
        })
    }

    fn parse_tagged(output: &str) -> Option<Self> {
        // Tags may contain dashes themselves, so split from the right.
        let mut parts = output.rsplitn(3, '-');
        let hash = parts.next()?.strip_prefix('g')?;
        let distance = parts.next()?;
        let tag = parts.next()?;

        if tag.is_empty()
            || hash.is_empty()
            || !hash.chars().all(|c| c.is_ascii_hexdigit())
            || distance.is_empty()
            || !distance.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        Some(Self::Tagged {
            tag: tag.to_string(),
            distance: distance.parse().ok()?,
            hash: hash.to_string(),
        })
    }
}

/// The raw answers gathered from git for one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnswers {
    /// `git branch --show-current`.
    pub branch: Option<String>,
    /// `git rev-parse HEAD`.
    pub full_hash: Option<String>,
    /// `git status --porcelain`.
    pub cleanliness: Cleanliness,
    /// `git describe ...`.
    pub description: Option<String>,
}

impl RawAnswers {
    /// Applies the version rules:
    ///
    /// 1. no describe output: `unspecified`;
    /// 2. untagged output is the version as-is;
    /// 3. `tag` on an exact, clean tag, otherwise `tag.N.g<hash>`;
    /// 4. a dirty tree appends `.dirty` to 2 and 3;
    /// 5. unknown cleanliness appends nothing and leaves `is_clean` empty.
    ///
    /// Branch and hash never influence the version. A branch is only reported
    /// when HEAD resolves to a commit, since git names the unborn branch of
    /// an empty repository.
    #[must_use]
    pub fn into_details(self) -> VersionDetails {
        let branch = self.full_hash.as_ref().and(self.branch);
        let is_clean = self.cleanliness.as_bool();

        let Some(output) = self.description else {
            return VersionDetails {
                branch,
                full_hash: self.full_hash,
                is_clean,
                ..VersionDetails::unspecified()
            };
        };

        let description = Description::parse(&output);
        let (base, abbreviated_hash, commit_distance, is_clean_tag) = match description {
            Description::Tagged {
                tag,
                distance,
                hash,
            } => {
                let clean_tag = distance == 0 && self.cleanliness == Cleanliness::Clean;
                let base = if clean_tag {
                    tag
                } else {
                    format!("{tag}.{distance}.g{hash}")
                };
                (base, Some(hash), Some(distance), clean_tag)
            }
            Description::Untagged { output } => {
                let is_hex = output.chars().all(|c| c.is_ascii_hexdigit());
                let hash = is_hex.then(|| output.clone());
                (output, hash, None, false)
            }
        };

        let version = match self.cleanliness {
            Cleanliness::Dirty => format!("{base}{DIRTY_SUFFIX}"),
            Cleanliness::Clean | Cleanliness::Unknown => base,
        };

        VersionDetails {
            version,
            branch,
            full_hash: self.full_hash,
            abbreviated_hash,
            commit_distance,
            is_clean_tag,
            is_clean,
        }
    }
}

/// Resolves the version of one repository for one tag prefix.
pub struct VersionResolver {
    inspector: GitInspector,
    prefix: TagPrefix,
}

impl VersionResolver {
    /// Binds an inspector to a tag prefix.
    #[must_use]
    pub fn new(inspector: GitInspector, prefix: TagPrefix) -> Self {
        Self { inspector, prefix }
    }

    /// Asks git each question, timing every command under its own name.
    #[must_use]
    pub fn gather(&self, timer: &Timer) -> RawAnswers {
        RawAnswers {
            description: timer.record("describe", || self.inspector.describe(&self.prefix)),
            cleanliness: timer.record("status", || self.inspector.cleanliness()),
            branch: timer.record("branch", || self.inspector.current_branch()),
            full_hash: timer.record("full_hash", || self.inspector.current_full_hash()),
        }
    }

    /// Gathers the raw answers and turns them into [`VersionDetails`].
    #[must_use]
    pub fn resolve(&self, timer: &Timer) -> VersionDetails {
        let details = self.gather(timer).into_details();
        tracing::info!(
            worktree = %self.inspector.worktree().display(),
            prefix = %self.prefix,
            version = %details.version,
            "resolved version"
        );
        details
    }
}
