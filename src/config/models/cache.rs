//! Resolver memoization configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Memoization configuration for `effective_rights`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable memoization
    #[serde(default)]
    pub enabled: bool,
    /// Entry TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
    /// Maximum number of memoized results
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
    /// Evaluation timestamps are floored to this many seconds in cache keys
    #[serde(default = "default_timestamp_granularity")]
    pub timestamp_granularity_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_seconds: default_cache_ttl(),
            max_entries: default_cache_max_entries(),
            timestamp_granularity_seconds: default_timestamp_granularity(),
        }
    }
}

impl CacheConfig {
    /// Entry TTL as a duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Merge cache configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.enabled {
            self.enabled = other.enabled;
        }
        if other.ttl_seconds != default_cache_ttl() {
            self.ttl_seconds = other.ttl_seconds;
        }
        if other.max_entries != default_cache_max_entries() {
            self.max_entries = other.max_entries;
        }
        if other.timestamp_granularity_seconds != default_timestamp_granularity() {
            self.timestamp_granularity_seconds = other.timestamp_granularity_seconds;
        }
        self
    }
}
