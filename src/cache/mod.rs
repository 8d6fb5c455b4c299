//! Cache Module
//!
//! Provides in-memory response caching with TTL expiry, stale-while-revalidate
//! and in-flight request deduplication.

mod entry;
mod pending;
mod response;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use pending::{FetchChannel, PendingFetch, PENDING_MAX_AGE_MS};
pub use response::{FetchOptions, ResponseCache};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{CacheStore, Lookup, PrefetchLookup};

// == Public Constants ==
/// Default freshness window for cached responses (5 minutes).
pub const DEFAULT_TTL_MS: u64 = 300_000;
