//! response-cache - An in-memory cache for asynchronous fetch results
//!
//! Provides TTL expiry, stale-while-revalidate background refresh and
//! in-flight request deduplication behind a single async `get` call.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, FetchOptions, ResponseCache, StatsSnapshot, DEFAULT_TTL_MS};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
