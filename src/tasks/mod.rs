//! Background Tasks Module
//!
//! Periodic maintenance running alongside the cache.

mod cleanup;

pub use cleanup::{spawn_cleanup_task, spawn_cleanup_task_from_config};
