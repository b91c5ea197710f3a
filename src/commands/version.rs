//! Handler for the `version` command.

use std::io::Write;

use crate::config::Settings;
use crate::version::VersionService;

/// Print the version string of the repository containing the start directory.
///
/// # Errors
///
/// Returns an error string if the repository cannot be found or git cannot run.
pub fn run(
    service: &VersionService,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<(), String> {
    let version = service
        .git_version(&settings.start_dir, &settings.prefix)
        .map_err(|e| e.to_string())?;
    super::write_line(out, &version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{output, service, settings};
    use crate::testing::ScriptedRunner;

    const HASH: &str = "abc1234def5678abc1234def5678abc1234def56";

    #[test]
    fn prints_version_line() {
        let service = service(ScriptedRunner::repository("v2.1.0-4-gabc1234", HASH));
        let mut buf = Vec::new();
        run(&service, &settings("/work/app/src"), &mut buf).unwrap();
        assert_eq!(output(buf), "v2.1.0.4.gabc1234\n");
    }

    #[test]
    fn outside_a_repository_is_an_error() {
        let service = service(ScriptedRunner::new());
        let mut buf = Vec::new();
        let err = run(&service, &settings("/elsewhere"), &mut buf).unwrap_err();
        assert!(err.contains("cannot find '.git' directory"));
        assert!(buf.is_empty());
    }
}
