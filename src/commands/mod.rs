//! Command dispatch and handlers.

pub mod details;
pub mod root;
pub mod version;

use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::{Cli, Command};
use crate::config::{Mode, Settings};
use crate::context::ServiceContext;
use crate::version::{ResolutionCache, VersionService};

/// Dispatch a parsed command to its handler.
///
/// When `GITVERSION_RECORD` is set, every git invocation is recorded to that
/// cassette file; when `GITVERSION_REPLAY` is set, git answers come from it.
///
/// # Errors
///
/// Returns an error string if settings are invalid or the handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let settings = Settings::from_cli(cli)?;
    let ctx = match &settings.mode {
        Mode::Live => ServiceContext::live(),
        Mode::Record(path) => ServiceContext::recording(path, &settings.start_dir),
        Mode::Replay(path) => ServiceContext::replaying(path)?,
    };
    let service = VersionService::from_context(&ctx, Arc::new(ResolutionCache::new()));

    let mut stdout = io::stdout().lock();
    let result = dispatch_with_service(&cli.command, &settings, &service, &mut stdout);

    if settings.timings {
        eprintln!("{}", service.timer().to_json());
    }

    // Recording contexts write their cassette on drop, even after an error.
    drop(service);
    drop(ctx);
    result
}

/// Dispatch a command against the given service, writing output to `out`.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_service(
    command: &Command,
    settings: &Settings,
    service: &VersionService,
    out: &mut dyn Write,
) -> Result<(), String> {
    match command {
        Command::Version => version::run(service, settings, out),
        Command::Details { format } => details::run(service, settings, *format, out),
        Command::Root => root::run(service, settings, out),
    }
}

fn write_line(out: &mut dyn Write, text: &str) -> Result<(), String> {
    writeln!(out, "{text}").map_err(|e| format!("Failed to write output: {e}"))
}
