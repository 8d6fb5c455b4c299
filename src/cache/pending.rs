//! Pending Fetch Module
//!
//! Bookkeeping for in-flight fetches, used for request deduplication.
//!
//! Every fetch runs on a spawned task that reports through a oneshot
//! channel. The receiving end is wrapped in [`Shared`] so any number of
//! deduplicated callers can await the same underlying fetch.

use futures::future::Shared;
use tokio::sync::oneshot;

use crate::cache::entry::current_timestamp_ms;
use crate::error::Result;

// == Constants ==
/// Age past which `cleanup` discards a pending tracker (milliseconds).
///
/// Trackers are normally removed when their fetch settles; this sweep only
/// catches fetchers that never settle (the spawned fetch itself is not
/// cancelled, only the cache's reference to it is dropped, after which a
/// new `get` on the key starts a fresh fetch).
pub const PENDING_MAX_AGE_MS: u64 = 30_000;

// == Fetch Channel ==
/// Channel on which deduplicated callers wait for a shared fetch result.
///
/// A closed channel means the fetch task stopped without settling and is
/// surfaced to waiters as [`crate::error::CacheError::Aborted`].
pub type FetchChannel<T> = Shared<oneshot::Receiver<Result<T>>>;

// == Pending Fetch ==
/// A fetch that has started but not yet settled.
///
/// At most one of these exists per key at any instant; it is removed
/// unconditionally once the fetch resolves or rejects.
#[derive(Clone)]
pub struct PendingFetch<T> {
    /// Shared receiver for the fetch result
    pub channel: FetchChannel<T>,
    /// Fetch start timestamp (Unix milliseconds)
    pub started_at: u64,
}

impl<T> PendingFetch<T> {
    // == Constructor ==
    /// Wraps a fetch channel with the current timestamp.
    pub fn new(channel: FetchChannel<T>) -> Self {
        Self {
            channel,
            started_at: current_timestamp_ms(),
        }
    }

    // == Is Abandoned ==
    /// Checks whether the tracker has outlived [`PENDING_MAX_AGE_MS`].
    pub fn is_abandoned(&self) -> bool {
        current_timestamp_ms().saturating_sub(self.started_at) > PENDING_MAX_AGE_MS
    }
}
