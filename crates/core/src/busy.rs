//! Per-entity busy flags.
//!
//! A flag is held for the duration of one request. While it is held, a
//! second action on the same entity is refused locally instead of sending a
//! duplicate request. Dropping the guard releases the flag on every exit
//! path, including early returns and errors.

use std::{fmt::Debug, hash::Hash, sync::Arc};

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

/// Set of entities with a request in flight.
#[derive(Debug)]
pub struct BusyFlags<K> {
    held: Arc<Mutex<FxHashSet<K>>>,
}

impl<K> Default for BusyFlags<K> {
    fn default() -> Self {
        Self {
            held: Arc::new(Mutex::new(FxHashSet::default())),
        }
    }
}

impl<K> Clone for BusyFlags<K> {
    fn clone(&self) -> Self {
        Self {
            held: Arc::clone(&self.held),
        }
    }
}

impl<K: Eq + Hash + Clone> BusyFlags<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the flag for `key`, or `None` if it is already held.
    #[must_use]
    pub fn try_acquire(&self, key: K) -> Option<BusyGuard<K>> {
        if !self.held.lock().insert(key.clone()) {
            return None;
        }

        Some(BusyGuard {
            held: Arc::clone(&self.held),
            key,
        })
    }

    #[must_use]
    pub fn is_busy(&self, key: &K) -> bool {
        self.held.lock().contains(key)
    }

    /// Number of flags currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.lock().is_empty()
    }
}

/// Releases its flag when dropped.
#[must_use = "the flag is released as soon as the guard is dropped"]
pub struct BusyGuard<K: Eq + Hash> {
    held: Arc<Mutex<FxHashSet<K>>>,
    key: K,
}

impl<K: Eq + Hash> BusyGuard<K> {
    pub const fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash + Debug> Debug for BusyGuard<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusyGuard").field("key", &self.key).finish()
    }
}

impl<K: Eq + Hash> Drop for BusyGuard<K> {
    fn drop(&mut self) {
        self.held.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_of_same_key_is_refused() {
        let flags = BusyFlags::new();

        let guard = flags.try_acquire(7_i64);

        assert!(guard.is_some());
        assert!(flags.try_acquire(7).is_none());
        assert!(flags.try_acquire(8).is_some());
    }

    #[test]
    fn dropping_the_guard_releases_the_flag() {
        let flags = BusyFlags::new();

        {
            let _guard = flags.try_acquire("order-1");
            assert!(flags.is_busy(&"order-1"));
        }

        assert!(!flags.is_busy(&"order-1"));
        assert!(flags.is_empty());
    }

    #[test]
    fn clones_share_the_same_flags() {
        let flags = BusyFlags::new();
        let view = flags.clone();

        let _guard = flags.try_acquire(1_u8);

        assert!(view.try_acquire(1).is_none());
        assert_eq!(view.len(), 1);
    }
}
