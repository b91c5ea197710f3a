//! Handler for the `details` command.

use std::io::Write;

use crate::cli::Format;
use crate::config::Settings;
use crate::version::VersionService;

/// Print every resolved version attribute in the requested format.
///
/// # Errors
///
/// Returns an error string if resolution or serialization fails.
pub fn run(
    service: &VersionService,
    settings: &Settings,
    format: Format,
    out: &mut dyn Write,
) -> Result<(), String> {
    let details = service
        .version_details(&settings.start_dir, &settings.prefix)
        .map_err(|e| e.to_string())?;
    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(details.as_ref())
            .map_err(|e| format!("Failed to serialize details: {e}"))?,
        Format::Yaml => serde_yaml::to_string(details.as_ref())
            .map_err(|e| format!("Failed to serialize details: {e}"))?,
    };
    super::write_line(out, rendered.trim_end())
}
