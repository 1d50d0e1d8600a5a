//! In-process exclusivity keyed by target path
//!
//! The atomic writer guards a single write with an advisory file lock, but a
//! handler reads, merges and writes as one unit. Workers that may touch the
//! same file take the path's lock for that whole unit.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::NormalizedPath;

/// Registry of per-path mutexes, shared between worker threads.
#[derive(Debug, Default, Clone)]
pub struct PathLocks {
    inner: Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>,
}

/// Holds the exclusive right to read-modify-write one path.
pub struct PathGuard {
    lock: Arc<Mutex<()>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the guard for `path`, registering the path on first use.
    ///
    /// This does not block; [`PathGuard::run`] waits for the lock.
    pub fn lock(&self, path: &NormalizedPath) -> PathGuard {
        let key = path.canonical();
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(key).or_default())
        };
        PathGuard { lock }
    }

    /// Number of distinct paths seen so far.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PathGuard {
    /// Run `f` while holding the path's lock.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let _held: MutexGuard<'_, ()> = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_shares_one_entry() {
        let locks = PathLocks::new();
        let a = NormalizedPath::new("/nonexistent-fleet/dir/pyproject.toml");
        locks.lock(&a).run(|| ());
        locks.lock(&a).run(|| ());
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn distinct_paths_get_distinct_entries() {
        let locks = PathLocks::new();
        locks
            .lock(&NormalizedPath::new("/nonexistent-fleet/a.toml"))
            .run(|| ());
        locks
            .lock(&NormalizedPath::new("/nonexistent-fleet/b.toml"))
            .run(|| ());
        assert_eq!(locks.len(), 2);
    }
}
