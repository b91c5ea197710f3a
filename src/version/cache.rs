//! Process-wide memoization of resolved versions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::version::details::VersionDetails;
use crate::version::locator::RepositoryRoot;
use crate::version::prefix::TagPrefix;
use crate::version::timer::{Timer, RESOLVE};

/// Identifies one cache entry: a repository root and a tag prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    /// Repository the version belongs to.
    pub root: RepositoryRoot,
    /// Prefix tags were filtered by.
    pub prefix: TagPrefix,
}

impl ResolutionKey {
    /// Creates a key.
    #[must_use]
    pub fn new(root: RepositoryRoot, prefix: TagPrefix) -> Self {
        Self { root, prefix }
    }
}

type Slot = Arc<Mutex<Option<Arc<VersionDetails>>>>;

/// Maps (root, prefix) to a version resolved at most once per process.
///
/// The map lock is held only long enough to find or insert a key's slot.
/// Resolution runs under the slot's own lock, so concurrent callers of the
/// same key wait for one computation while other keys proceed independently.
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    slots: Mutex<HashMap<ResolutionKey, Slot>>,
    timer: Timer,
}

impl ResolutionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached details for `key`, running `resolve` if there are none.
    ///
    /// `resolve` receives the cache's timer; its total runtime is recorded
    /// under [`RESOLVE`]. A failed resolution leaves the slot empty.
    ///
    /// # Errors
    ///
    /// Returns whatever error `resolve` returns.
    pub fn get_or_resolve<F>(&self, key: &ResolutionKey, resolve: F) -> Result<Arc<VersionDetails>>
    where
        F: FnOnce(&Timer) -> Result<VersionDetails>,
    {
        let slot = self.slot(key);
        let mut entry = lock(&slot);
        if let Some(details) = entry.as_ref() {
            tracing::debug!(root = %key.root, prefix = %key.prefix, "version cache hit");
            return Ok(Arc::clone(details));
        }

        let details = Arc::new(self.timer.record(RESOLVE, || resolve(&self.timer))?);
        *entry = Some(Arc::clone(&details));
        Ok(details)
    }

    /// Returns the cached details for `key` without resolving.
    #[must_use]
    pub fn get(&self, key: &ResolutionKey) -> Option<Arc<VersionDetails>> {
        let slot = lock(&self.slots).get(key).cloned()?;
        let entry = lock(&slot);
        entry.clone()
    }

    /// Number of resolved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    /// Returns `true` if nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Timings of every resolution run through this cache.
    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    fn slot(&self, key: &ResolutionKey) -> Slot {
        let mut slots = lock(&self.slots);
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
