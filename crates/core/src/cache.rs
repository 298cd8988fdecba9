//! In-memory TTL cache with an injectable clock.
//!
//! Entries expire a fixed duration after insertion. Time comes from a
//! [`Clock`] implementation so expiry is testable without wall-clock
//! sleeps; production code uses [`SystemClock`].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// A keyed cache whose entries expire `ttl` after insertion.
///
/// Interior mutability keeps the cache shareable across handlers behind an
/// `Arc`. Expired entries are dropped lazily on read and eagerly via
/// [`TtlCache::purge_expired`].
pub struct TtlCache<K, V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Cache backed by the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    /// Cache with an explicit clock; tests pass a manual one.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a live entry, dropping it if it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();

        if let Some(entry) = entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    /// Insert or replace an entry, resetting its expiry.
    pub fn insert(&self, key: K, value: V) {
        let expires_at = self.clock.now() + self.ttl;
        self.lock().insert(key, Entry { value, expires_at });
    }

    /// Remove an entry regardless of expiry. Returns whether it was present.
    pub fn invalidate(&self, key: &K) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, Entry<V>>> {
        // A poisoned map is still structurally valid; keep serving.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
