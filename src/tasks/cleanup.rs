//! Cleanup Task
//!
//! Background task that periodically removes expired cache entries and
//! abandoned in-flight fetch trackers.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResponseCache;
use crate::config::Config;

/// Spawns a background task that periodically runs [`ResponseCache::cleanup`].
///
/// The task sleeps for `interval` between runs, for the life of the
/// process. The cache never depends on it for correctness: expired entries
/// are bypassed by `get` either way, and the sweep only reclaims memory and
/// drops trackers for fetchers that never settled.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache: ResponseCache<Payload> = ResponseCache::default();
/// let handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<T>(cache: ResponseCache<T>, interval: Duration) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting cache cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let (expired, abandoned) = cache.cleanup().await;

            if expired > 0 || abandoned > 0 {
                info!(expired, abandoned, "Cache cleanup removed entries");
            } else {
                debug!("Cache cleanup: nothing to remove");
            }
        }
    })
}

/// Convenience wrapper taking the interval from [`Config`].
pub fn spawn_cleanup_task_from_config<T>(cache: ResponseCache<T>, config: &Config) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    spawn_cleanup_task(cache, Duration::from_secs(config.cleanup_interval_secs))
}
