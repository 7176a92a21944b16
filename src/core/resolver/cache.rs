//! Time-bucketed memoization of resolved right sets

use crate::config::CacheConfig;
use crate::core::models::{PerimeterId, ProfileId, RightSet, Timestamp};
use moka::sync::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Memoization key; a different store or hierarchy, or any store mutation, changes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolverCacheKey {
    pub profile_id: ProfileId,
    pub perimeter_id: PerimeterId,
    /// Evaluation instant floored to the configured granularity
    pub time_bucket: i64,
    pub store_version: u64,
    pub hierarchy_revision: u64,
}

/// Hit and miss counters
#[derive(Debug, Default)]
struct AtomicCacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache statistics snapshot
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Shared memo of `effective_rights` results
pub struct ResolverCache {
    entries: Cache<ResolverCacheKey, Arc<RightSet>>,
    granularity_seconds: i64,
    stats: AtomicCacheStats,
}

impl ResolverCache {
    pub fn new(config: &CacheConfig) -> Self {
        info!(
            "Resolver cache enabled: {} entries, ttl {}s, granularity {}s",
            config.max_entries, config.ttl_seconds, config.timestamp_granularity_seconds
        );
        Self {
            entries: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(config.ttl())
                .build(),
            granularity_seconds: i64::try_from(config.timestamp_granularity_seconds)
                .unwrap_or(i64::MAX)
                .max(1),
            stats: AtomicCacheStats::default(),
        }
    }

    /// A cache when enabled by configuration
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        config.enabled.then(|| Self::new(config))
    }

    pub fn key(
        &self,
        profile_id: ProfileId,
        perimeter_id: PerimeterId,
        at: Timestamp,
        store_version: u64,
        hierarchy_revision: u64,
    ) -> ResolverCacheKey {
        ResolverCacheKey {
            profile_id,
            perimeter_id,
            time_bucket: at.timestamp().div_euclid(self.granularity_seconds),
            store_version,
            hierarchy_revision,
        }
    }

    pub fn get(&self, key: &ResolverCacheKey) -> Option<Arc<RightSet>> {
        let found = self.entries.get(key);
        let counter = if found.is_some() {
            &self.stats.hits
        } else {
            &self.stats.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, key: ResolverCacheKey, rights: Arc<RightSet>) {
        self.entries.insert(key, rights);
    }

    /// Drop every memoized result
    pub fn invalidate_all(&self) {
        debug!("Invalidating resolver cache");
        self.entries.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
        }
    }
}
