//! Configuration data models
//!
//! This module defines all configuration structures used by the engine.

pub mod cache;
pub mod catalog;
pub mod engine;
pub mod hierarchy;
pub mod logging;

// Re-export all configuration types
pub use cache::*;
pub use catalog::*;
pub use engine::*;
pub use hierarchy::*;
pub use logging::*;

/// Default maximum parent-traversal depth
pub fn default_max_depth() -> usize {
    64
}

/// Default memoization TTL in seconds
pub fn default_cache_ttl() -> u64 {
    60
}

/// Default memoization capacity
pub fn default_cache_max_entries() -> u64 {
    10_000
}

/// Default timestamp rounding applied to memoization keys, in seconds
pub fn default_timestamp_granularity() -> u64 {
    60
}

/// Default true value
pub fn default_true() -> bool {
    true
}
