//! Error types for the response cache
//!
//! Provides unified error handling using thiserror.
//!
//! The cache itself adds no failure modes of its own: every error a caller
//! can observe originates from the fetcher it supplied. Errors are `Clone`
//! because a single failed fetch may have several deduplicated waiters, each
//! of which receives the same rejection.

use std::fmt::Display;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache fetch operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The supplied fetcher failed
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The fetch task stopped without settling (panic or runtime shutdown)
    #[error("fetch for key '{0}' aborted before completing")]
    Aborted(String),
}

impl CacheError {
    /// Wraps an arbitrary fetcher failure.
    ///
    /// Convenient as `map_err(CacheError::fetch)` inside a fetcher closure.
    pub fn fetch(err: impl Display) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
