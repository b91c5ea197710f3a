//! Runtime settings resolved from CLI flags and the environment.
//!
//! A `.env` file in the working directory is loaded before arguments are
//! parsed, so every variable below can also be set there.

use std::env;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::version::prefix::TagPrefix;

/// Tag prefix used when `--prefix` is not given.
pub const PREFIX_ENV: &str = "GITVERSION_PREFIX";
/// Record every git invocation to this cassette file.
pub const RECORD_ENV: &str = "GITVERSION_RECORD";
/// Answer git invocations from this cassette file instead of running git.
pub const REPLAY_ENV: &str = "GITVERSION_REPLAY";
/// Log filter directives (e.g. `gitversion=debug`).
pub const LOG_ENV: &str = "GITVERSION_LOG";

/// Where git answers come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Spawn git.
    Live,
    /// Spawn git and record each invocation to the given cassette.
    Record(PathBuf),
    /// Replay invocations from the given cassette.
    Replay(PathBuf),
}

/// Fully resolved settings for one CLI run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory the repository search starts from.
    pub start_dir: PathBuf,
    /// Tag prefix filter.
    pub prefix: TagPrefix,
    /// Source of git answers.
    pub mode: Mode,
    /// Print timings after the command.
    pub timings: bool,
}

impl Settings {
    /// Resolves settings from parsed arguments and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error string if the prefix is invalid, the current
    /// directory cannot be read, or both recording and replaying are enabled.
    pub fn from_cli(cli: &Cli) -> Result<Self, String> {
        Self::resolve(cli, |key| env::var(key).ok())
    }

    fn resolve(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let start_dir = match &cli.dir {
            Some(dir) => dir.clone(),
            None => env::current_dir()
                .map_err(|e| format!("Failed to read current directory: {e}"))?,
        };
        let prefix = TagPrefix::new(&cli.prefix).map_err(|e| e.to_string())?;

        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mode = match (non_empty(RECORD_ENV), non_empty(REPLAY_ENV)) {
            (Some(_), Some(_)) => {
                return Err(format!("{RECORD_ENV} and {REPLAY_ENV} cannot both be set"));
            }
            (Some(path), None) => Mode::Record(PathBuf::from(path)),
            (None, Some(path)) => Mode::Replay(PathBuf::from(path)),
            (None, None) => Mode::Live,
        };

        Ok(Self {
            start_dir,
            prefix,
            mode,
            timings: cli.timings,
        })
    }
}
