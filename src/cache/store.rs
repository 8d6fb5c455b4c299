//! Cache Store Module
//!
//! Synchronous map layer combining entry storage, in-flight fetch tracking
//! and statistics. All methods are plain `&mut self` mutations with no
//! suspension points, so a caller holding the surrounding lock performs
//! classification and pending registration atomically with respect to
//! every other caller.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::cache::entry::CacheEntry;
use crate::cache::pending::{FetchChannel, PendingFetch};
use crate::cache::stats::{CacheStats, StatsSnapshot};

// == Lookup Classification ==
/// Outcome of classifying a `get` against the current maps.
///
/// The matching counter has already been incremented when this is returned.
pub enum Lookup<T> {
    /// Entry present and within its TTL
    Fresh(T),
    /// Entry present but past its TTL, servable under stale-while-revalidate.
    /// `refreshing` is true when a background fetch for the key is already
    /// in flight, in which case the caller must not start another.
    Stale { data: T, refreshing: bool },
    /// No usable entry, but a fetch for the key is already in flight
    InFlight(FetchChannel<T>),
    /// Nothing to serve; the caller starts a fetch
    Miss,
}

/// Outcome of classifying a `prefetch` against the current maps.
pub enum PrefetchLookup<T> {
    /// An entry exists (fresh or stale), prefetch does nothing
    Cached,
    /// A fetch for the key is already in flight
    InFlight(FetchChannel<T>),
    /// Nothing cached or in flight
    Miss,
}

// == Cache Store ==
/// Entry and pending-fetch maps with statistics.
///
/// Keys are caller-supplied opaque strings; the store only inspects them
/// during pattern invalidation. At most one entry and one pending tracker
/// exist per key at any instant.
pub struct CacheStore<T> {
    /// Cached responses by key
    entries: HashMap<String, CacheEntry<T>>,
    /// In-flight fetches by key
    pending: HashMap<String, PendingFetch<T>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<T> CacheStore<T> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            pending: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    // == Lookup ==
    /// Classifies a `get` for `key` and records the matching counter.
    ///
    /// Resolution order: fresh entry, then stale entry (only when
    /// `stale_while_revalidate` is set; otherwise an expired entry counts
    /// as a miss), then in-flight fetch, then miss.
    pub fn lookup(&mut self, key: &str, stale_while_revalidate: bool) -> Lookup<T>
    where
        T: Clone,
    {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_fresh() {
                self.stats.record_hit();
                return Lookup::Fresh(entry.data.clone());
            }
            if stale_while_revalidate {
                // Stale data is still a hit: the caller gets it immediately.
                self.stats.record_hit();
                return Lookup::Stale {
                    data: entry.data.clone(),
                    refreshing: self.pending.contains_key(key),
                };
            }
        }

        if let Some(pending) = self.pending.get(key) {
            self.stats.record_dedup();
            return Lookup::InFlight(pending.channel.clone());
        }

        self.stats.record_miss();
        Lookup::Miss
    }

    // == Prefetch Lookup ==
    /// Classifies a `prefetch` for `key`.
    ///
    /// Any entry, fresh or stale, makes prefetch a no-op; it never refreshes
    /// data that is merely stale.
    pub fn prefetch_lookup(&mut self, key: &str) -> PrefetchLookup<T> {
        if self.entries.contains_key(key) {
            return PrefetchLookup::Cached;
        }
        if let Some(pending) = self.pending.get(key) {
            self.stats.record_dedup();
            return PrefetchLookup::InFlight(pending.channel.clone());
        }
        self.stats.record_miss();
        PrefetchLookup::Miss
    }

    // == Insert ==
    /// Installs a fresh entry for `key`, replacing any previous one.
    ///
    /// Pending fetches are untouched: an in-flight fetch for the same key
    /// will overwrite this entry when it settles (last writer wins).
    pub fn insert(&mut self, key: String, data: T, ttl_ms: u64) {
        self.entries.insert(key, CacheEntry::new(data, ttl_ms));
    }

    // == Pending Tracking ==
    /// Registers an in-flight fetch for `key`.
    ///
    /// Must happen under the same lock acquisition as the [`Lookup::Miss`]
    /// classification that triggered the fetch, so concurrent callers
    /// observe [`Lookup::InFlight`] instead of starting their own.
    pub fn register_pending(&mut self, key: String, channel: FetchChannel<T>) {
        self.pending.insert(key, PendingFetch::new(channel));
    }

    /// Drops the in-flight tracker for `key`, if any.
    pub fn remove_pending(&mut self, key: &str) {
        self.pending.remove(key);
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Returns whether one was present.
    ///
    /// An in-flight fetch for the key is not cancelled.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes every entry whose key matches `pattern`.
    ///
    /// Pending fetches are untouched. Returns the number of removed entries.
    pub fn invalidate_pattern(&mut self, pattern: &Regex) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.is_match(key));
        before - self.entries.len()
    }

    // == Clear ==
    /// Empties both maps. Statistics are preserved.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending.clear();
    }

    // == Cleanup ==
    /// Removes expired entries and abandoned pending trackers.
    ///
    /// Returns `(expired, abandoned)` removal counts.
    pub fn cleanup(&mut self) -> (usize, usize) {
        let entries_before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh());
        let expired = entries_before - self.entries.len();

        let pending_before = self.pending.len();
        self.pending.retain(|_, pending| !pending.is_abandoned());
        let abandoned = pending_before - self.pending.len();

        (expired, abandoned)
    }

    // == Stats ==
    /// Returns a snapshot of counters and current map sizes.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot::new(&self.stats, self.entries.len(), self.pending.len())
    }

    /// Returns a copy of the raw counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Introspection ==
    /// Whether any entry, fresh or stale, exists for `key`.
    pub fn has_entry(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Current number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Current number of in-flight fetch trackers.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if no entries are cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn insert_pending_for_test(&mut self, key: String, pending: PendingFetch<T>) {
        self.pending.insert(key, pending);
    }
}

impl<T> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Shared fetch channels have no useful Debug form; report sizes instead.
impl<T> fmt::Debug for CacheStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("pending", &self.pending.len())
            .field("stats", &self.stats)
            .finish()
    }
}
