//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL-based
//! freshness classification.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached value with its freshness metadata.
///
/// Entries are immutable once stored; a refresh produces a new entry that
/// replaces the old one by key.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Storage timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Timestamp at which the entry turns stale (Unix milliseconds)
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry that stays fresh for `ttl_ms` milliseconds.
    pub fn new(data: T, ttl_ms: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            data,
            created_at: now,
            expires_at: now + ttl_ms,
        }
    }

    // == Is Fresh ==
    /// Checks whether the entry is still within its TTL.
    ///
    /// Boundary condition: the entry is fresh strictly before `expires_at`;
    /// at the expiration timestamp itself it already counts as stale.
    pub fn is_fresh(&self) -> bool {
        current_timestamp_ms() < self.expires_at
    }

    /// Checks whether the TTL has elapsed. A stale entry is still present
    /// and servable under stale-while-revalidate; it is not evicted until
    /// a refresh replaces it or `cleanup` removes it.
    pub fn is_stale(&self) -> bool {
        !self.is_fresh()
    }

    // == Time To Live ==
    /// Returns remaining freshness in milliseconds, 0 once stale.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
