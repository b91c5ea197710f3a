//! Service context bundling the port implementations.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::{LiveCommandRunner, LiveFileSystem};
use crate::adapters::recording::RecordingCommandRunner;
use crate::adapters::replaying::ReplayingCommandRunner;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::command::CommandRunner;
use crate::ports::filesystem::FileSystem;

/// Bundles the port trait objects resolution runs against.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying). Repository discovery always uses the real filesystem; only
/// process execution is recorded or replayed.
pub struct ServiceContext {
    /// Runner for external commands.
    pub runner: Arc<dyn CommandRunner>,
    /// Filesystem for repository discovery.
    pub fs: Arc<dyn FileSystem>,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context that spawns real processes.
    #[must_use]
    pub fn live() -> Self {
        Self {
            runner: Arc::new(LiveCommandRunner),
            fs: Arc::new(LiveFileSystem),
            recorder: None,
        }
    }

    /// Creates a recording context that writes a cassette to `path` on drop.
    ///
    /// Commands still run for real; each invocation and its result is
    /// captured. `root` is stored in the cassette header for reference.
    #[must_use]
    pub fn recording(path: &Path, root: &Path) -> Self {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("gitversion-session")
            .to_string();
        let recorder = CassetteRecorder::new(path, name, root.display().to_string());
        let recorder = Arc::new(Mutex::new(recorder));
        let live: Arc<dyn CommandRunner> = Arc::new(LiveCommandRunner);
        let runner = RecordingCommandRunner::new(live, Arc::clone(&recorder));
        Self {
            runner: Arc::new(runner),
            fs: Arc::new(LiveFileSystem),
            recorder: Some(recorder),
        }
    }

    /// Creates a replaying context that answers commands from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette = Cassette::from_yaml(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Creates a replaying context from an already loaded cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        let runner = ReplayingCommandRunner::new(CassetteReplayer::new(cassette));
        Self {
            runner: Arc::new(runner),
            fs: Arc::new(LiveFileSystem),
            recorder: None,
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        // Services may still hold the runner; take the recorded state out
        // of the shared mutex rather than waiting for sole ownership.
        let recorder = {
            let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, CassetteRecorder::new("", "", ""))
        };
        match recorder.finish() {
            Ok(path) => tracing::info!(path = %path.display(), "wrote command cassette"),
            Err(e) => tracing::warn!(error = %e, "failed to write command cassette"),
        }
    }
}
