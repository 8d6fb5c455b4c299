//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses and deduplicated fetches.

use serde::Serialize;

// == Cache Stats ==
/// Monotonic performance counters.
///
/// Counters only ever increase for the life of the cache instance; not even
/// `clear` resets them. Exactly one counter increments per `get` call.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Served from cache, fresh or stale
    pub hits: u64,
    /// No usable entry or in-flight fetch; a new fetch was started
    pub misses: u64,
    /// Collapsed onto an already in-flight fetch
    pub deduped: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    ///
    /// Deduplicated calls are excluded from the ratio: they neither found
    /// nor missed an entry, they joined someone else's fetch.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Dedup ==
    /// Increments the deduplication counter.
    pub fn record_dedup(&mut self) {
        self.deduped += 1;
    }
}

// == Stats Snapshot ==
/// Point-in-time view of the cache, suitable for a diagnostics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub deduped: u64,
    /// Current number of cached entries, stale ones included
    pub size: usize,
    /// Current number of in-flight fetch trackers
    pub pending: usize,
    /// Hit rate as a two-decimal percentage string, "0.00%" with no traffic
    pub hit_rate: String,
}

impl StatsSnapshot {
    /// Builds a snapshot from the counters and current map sizes.
    pub fn new(stats: &CacheStats, size: usize, pending: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            deduped: stats.deduped,
            size,
            pending,
            hit_rate: format!("{:.2}%", stats.hit_rate() * 100.0),
        }
    }
}
