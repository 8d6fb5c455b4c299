//! Response Cache Module
//!
//! Async façade over [`CacheStore`]: serves cached results for repeatable
//! asynchronous operations, deduplicates concurrent fetches for the same
//! key, and refreshes stale entries in the background.
//!
//! Every fetch runs on a spawned task reporting through a shared oneshot
//! channel, whether it was started by a blocking miss or by a
//! stale-while-revalidate refresh. The task installs the entry and drops
//! the pending tracker when the fetch settles, success or failure.

use std::future::Future;
use std::sync::Arc;

use regex::Regex;
use tokio::sync::{oneshot, RwLock};
use tracing::debug;

use futures::FutureExt;

use crate::cache::pending::FetchChannel;
use crate::cache::store::{CacheStore, Lookup, PrefetchLookup};
use crate::cache::stats::StatsSnapshot;
use crate::cache::DEFAULT_TTL_MS;
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Fetch Options ==
/// Per-call options for [`ResponseCache::get`].
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Freshness window in milliseconds; `None` uses the cache default
    pub ttl_ms: Option<u64>,
    /// Serve an expired entry immediately and refresh in the background.
    /// When false, an expired entry is treated as a miss and the caller
    /// blocks on a fresh fetch.
    pub stale_while_revalidate: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            ttl_ms: None,
            stale_while_revalidate: true,
        }
    }
}

// == Response Cache ==
/// Process-local cache for the results of asynchronous fetch operations.
///
/// Cheap to clone; clones share the same maps and counters. Construct one
/// instance per payload type and hand it to the modules that need it; there
/// is deliberately no global instance.
///
/// Keys are caller-chosen strings and must be stable across equivalent
/// requests for deduplication to have any effect.
pub struct ResponseCache<T> {
    store: Arc<RwLock<CacheStore<T>>>,
    default_ttl_ms: u64,
}

impl<T> Clone for ResponseCache<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            default_ttl_ms: self.default_ttl_ms,
        }
    }
}

impl<T> Default for ResponseCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_MS)
    }
}

impl<T> ResponseCache<T> {
    // == Constructor ==
    /// Creates an empty cache with the given default TTL in milliseconds.
    pub fn new(default_ttl_ms: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new())),
            default_ttl_ms,
        }
    }

    /// Creates an empty cache configured from [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_ttl_ms)
    }
}

impl<T> ResponseCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Get ==
    /// Returns the cached value for `key`, fetching it if necessary.
    ///
    /// Resolution order:
    /// 1. A fresh entry is returned without invoking `fetcher`.
    /// 2. A stale entry is returned immediately when
    ///    `stale_while_revalidate` is set; `fetcher` is started in the
    ///    background (unless a refresh is already in flight) and its
    ///    failure is invisible to this caller.
    /// 3. An in-flight fetch for the key is joined; this caller awaits the
    ///    shared result instead of issuing a duplicate fetch.
    /// 4. Otherwise `fetcher` runs and its value is stored for `ttl_ms`.
    ///
    /// For concurrent calls with the same key issued before any of them
    /// resolves, the underlying fetcher runs at most once; all callers
    /// receive the same value or the same error. A failed fetch leaves
    /// nothing behind in the cache.
    pub async fn get<F, Fut>(&self, key: &str, fetcher: F, options: FetchOptions) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let ttl_ms = options.ttl_ms.unwrap_or(self.default_ttl_ms);

        // Classification and pending registration happen under one write
        // guard with no await inside, so concurrent callers of the same key
        // cannot both reach the miss path.
        let channel = {
            let mut store = self.store.write().await;
            match store.lookup(key, options.stale_while_revalidate) {
                Lookup::Fresh(data) => return Ok(data),
                Lookup::Stale { data, refreshing } => {
                    if !refreshing {
                        debug!(key, "serving stale entry, refreshing in background");
                        let channel = self.spawn_fetch(key.to_string(), fetcher(), ttl_ms);
                        store.register_pending(key.to_string(), channel);
                    }
                    return Ok(data);
                }
                Lookup::InFlight(channel) => channel,
                Lookup::Miss => {
                    debug!(key, "cache miss, starting fetch");
                    let channel = self.spawn_fetch(key.to_string(), fetcher(), ttl_ms);
                    store.register_pending(key.to_string(), channel.clone());
                    channel
                }
            }
        };

        await_shared(key, channel).await
    }

    // == Set ==
    /// Unconditionally installs a fresh entry, bypassing the fetch path.
    ///
    /// An in-flight fetch for the same key is not cancelled; when it
    /// settles it overwrites this entry.
    pub async fn set(&self, key: impl Into<String>, data: T, ttl_ms: Option<u64>) {
        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);
        self.store.write().await.insert(key.into(), data, ttl_ms);
    }

    // == Invalidate ==
    /// Removes the entry for `key` if present. Returns whether one existed.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.store.write().await.invalidate(key)
    }

    /// Removes every entry whose key matches `pattern`, e.g. all keys under
    /// a logical namespace. Returns the number of removed entries.
    pub async fn invalidate_pattern(&self, pattern: &Regex) -> usize {
        let removed = self.store.write().await.invalidate_pattern(pattern);
        if removed > 0 {
            debug!(pattern = pattern.as_str(), removed, "pattern invalidation");
        }
        removed
    }

    // == Clear ==
    /// Empties the entry and pending maps. Statistics are preserved.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    // == Stats ==
    /// Returns current counters and map sizes.
    pub async fn stats(&self) -> StatsSnapshot {
        self.store.read().await.snapshot()
    }

    // == Cleanup ==
    /// Removes expired entries and abandoned pending trackers.
    ///
    /// Returns `(expired, abandoned)` counts. Intended to run on a
    /// recurring timer (see [`crate::tasks::spawn_cleanup_task`]); `get`
    /// never depends on it for correctness.
    pub async fn cleanup(&self) -> (usize, usize) {
        self.store.write().await.cleanup()
    }

    // == Prefetch ==
    /// Warms the cache for `key` without returning the value.
    ///
    /// Does nothing when any entry for the key exists, fresh or stale.
    /// Otherwise joins or starts a fetch, awaits settlement and discards
    /// the outcome; prefetching never surfaces an error.
    pub async fn prefetch<F, Fut>(&self, key: &str, fetcher: F, ttl_ms: Option<u64>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);

        let channel = {
            let mut store = self.store.write().await;
            match store.prefetch_lookup(key) {
                PrefetchLookup::Cached => return,
                PrefetchLookup::InFlight(channel) => channel,
                PrefetchLookup::Miss => {
                    debug!(key, "prefetching");
                    let channel = self.spawn_fetch(key.to_string(), fetcher(), ttl_ms);
                    store.register_pending(key.to_string(), channel.clone());
                    channel
                }
            }
        };

        // The fetch task has already logged any failure.
        let _ = await_shared(key, channel).await;
    }

    // == Fetch Task ==
    /// Spawns `fetch` and returns the shared channel delivering its result.
    ///
    /// Not async on purpose: the task starts eagerly even if nobody awaits
    /// the channel, which is what makes fire-and-forget refreshes work. On
    /// success the entry is installed before the pending tracker is
    /// removed, so no concurrent caller can observe a gap between the two.
    fn spawn_fetch<Fut>(&self, key: String, fetch: Fut, ttl_ms: u64) -> FetchChannel<T>
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            let result = fetch.await;
            {
                let mut store = store.write().await;
                match &result {
                    Ok(data) => store.insert(key.clone(), data.clone(), ttl_ms),
                    Err(err) => debug!(key = %key, error = %err, "fetch failed, nothing cached"),
                }
                store.remove_pending(&key);
            }
            // Waiters may all be gone (background refreshes have none), so
            // a send failure is not an error.
            sender.send(result).ok();
        });

        receiver.shared()
    }
}

/// Awaits a shared fetch channel, mapping a closed channel (fetch task
/// panicked or the runtime shut down) to [`CacheError::Aborted`].
async fn await_shared<T: Clone>(key: &str, channel: FetchChannel<T>) -> Result<T> {
    match channel.await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Aborted(key.to_string())),
    }
}
