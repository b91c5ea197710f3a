//! Handler for the `root` command.

use std::io::Write;

use crate::config::Settings;
use crate::version::VersionService;

/// Print the repository root containing the start directory.
///
/// # Errors
///
/// Returns an error string if no repository contains the start directory.
pub fn run(
    service: &VersionService,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<(), String> {
    let root = service
        .repository_root(&settings.start_dir)
        .map_err(|e| e.to_string())?;
    super::write_line(out, &root.to_string())
}
