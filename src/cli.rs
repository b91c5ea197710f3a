//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::PREFIX_ENV;

/// Top-level CLI parser for `gitversion`.
#[derive(Debug, Parser)]
#[command(
    name = "gitversion",
    version,
    about = "Derive a build version from git history"
)]
pub struct Cli {
    /// Directory inside the repository (defaults to the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Only tags starting with this prefix are considered.
    #[arg(long, global = true, env = PREFIX_ENV, default_value = "")]
    pub prefix: String,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print time spent running git, as JSON on stderr.
    #[arg(long, global = true)]
    pub timings: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the version string.
    Version,
    /// Print every resolved version attribute.
    Details {
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print the repository root directory.
    Root,
}

/// Serialization format for `details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}
