//! Cumulative wall-clock timings for version resolution.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};

/// Name under which whole resolutions are recorded.
pub const RESOLVE: &str = "resolve";

/// Accumulates elapsed time per named operation.
///
/// Shared by every resolution in a process so a build can report how much
/// time went into asking git for versions.
#[derive(Debug, Default)]
pub struct Timer {
    totals: Mutex<BTreeMap<String, Duration>>,
}

impl Timer {
    /// Creates an empty timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f`, adding its elapsed time to the total for `name`.
    pub fn record<T>(&self, name: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.add(name, start.elapsed());
        result
    }

    /// Adds `elapsed` to the total for `name`.
    pub fn add(&self, name: &str, elapsed: Duration) {
        let mut totals = self.totals();
        *totals.entry(name.to_string()).or_default() += elapsed;
    }

    /// Total recorded for `name`, if anything was.
    #[must_use]
    pub fn total_for(&self, name: &str) -> Option<Duration> {
        self.totals().get(name).copied()
    }

    /// Time spent in whole resolutions.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total_for(RESOLVE).unwrap_or_default()
    }

    /// A copy of every total.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Duration> {
        self.totals().clone()
    }

    /// Totals in milliseconds as a JSON object, plus a `total` entry.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object: Map<String, Value> = self
            .snapshot()
            .into_iter()
            .map(|(name, elapsed)| (name, Value::from(duration_millis(elapsed))))
            .collect();
        let total = duration_millis(self.total());
        object.insert("total".to_string(), Value::from(total));
        Value::Object(object)
    }

    fn totals(&self) -> MutexGuard<'_, BTreeMap<String, Duration>> {
        self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn duration_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
