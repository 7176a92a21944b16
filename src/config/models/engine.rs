//! Main engine configuration

use super::*;
use crate::utils::error::{Result, RightsError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Hierarchy traversal configuration
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    /// Rights catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Resolver memoization
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        debug!("Loading engine configuration from environment variables");

        let mut config = Self::default();

        if let Ok(depth) = env::var("RIGHTS_MAX_DEPTH") {
            config.hierarchy.max_depth = depth
                .parse()
                .map_err(|e| RightsError::config(format!("Invalid max depth: {}", e)))?;
        }
        if let Ok(path) = env::var("RIGHTS_CATALOG_PATH") {
            config.catalog.path = Some(PathBuf::from(path));
        }
        if let Ok(enabled) = env::var("RIGHTS_CACHE_ENABLED") {
            config.cache.enabled = enabled
                .parse()
                .map_err(|e| RightsError::config(format!("Invalid cache flag: {}", e)))?;
        }
        if let Ok(ttl) = env::var("RIGHTS_CACHE_TTL") {
            config.cache.ttl_seconds = ttl
                .parse()
                .map_err(|e| RightsError::config(format!("Invalid cache TTL: {}", e)))?;
        }
        if let Ok(level) = env::var("RIGHTS_LOG_LEVEL") {
            config.logging.level = level.parse()?;
        }
        if let Ok(json) = env::var("RIGHTS_LOG_JSON") {
            config.logging.json = json
                .parse()
                .map_err(|e| RightsError::config(format!("Invalid log json flag: {}", e)))?;
        }

        Ok(config)
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.hierarchy = self.hierarchy.merge(other.hierarchy);
        self.catalog = self.catalog.merge(other.catalog);
        self.cache = self.cache.merge(other.cache);
        self.logging = self.logging.merge(other.logging);
        self
    }
}
