//! Engine configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

/// Upper bound on the configurable traversal depth
const MAX_ALLOWED_DEPTH: usize = 4096;

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating engine configuration");

        self.hierarchy.validate()?;
        self.catalog.validate()?;
        self.cache.validate()?;

        debug!("Engine configuration validation completed");
        Ok(())
    }
}

impl Validate for HierarchyConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("Hierarchy max depth must be greater than 0".to_string());
        }
        if self.max_depth > MAX_ALLOWED_DEPTH {
            return Err(format!(
                "Hierarchy max depth must not exceed {}",
                MAX_ALLOWED_DEPTH
            ));
        }
        Ok(())
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err("Catalog path must not be empty when set".to_string());
            }
        }
        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }

        if self.max_entries == 0 {
            return Err("Cache max entries must be greater than 0".to_string());
        }

        if self.timestamp_granularity_seconds == 0 {
            return Err("Cache timestamp granularity must be greater than 0".to_string());
        }

        Ok(())
    }
}
