//! Core functionality for the rights engine
//!
//! This module contains the catalog, hierarchy, access store, resolver and
//! delegation components, plus the `RightsEngine` tying them to configuration.

pub mod access;
pub mod catalog;
pub mod delegation;
pub mod models;
pub mod perimeter;
pub mod resolver;
pub mod snapshot;

use crate::config::Config;
use crate::utils::error::Result;
use catalog::RightCatalog;
use delegation::DelegationValidator;
use resolver::{ResolverCache, RightsResolver};
use snapshot::Snapshot;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Process-wide engine state: configuration, catalog and memo
#[derive(Clone)]
pub struct RightsEngine {
    /// Engine configuration
    config: Arc<Config>,
    /// Catalog loaded once at start
    catalog: Arc<RightCatalog>,
    /// Present only when caching is enabled
    cache: Option<Arc<ResolverCache>>,
}

impl RightsEngine {
    /// Load the configured catalog and set up memoization
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing rights engine");

        let catalog = RightCatalog::load(config.catalog()).await?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Engine over an already loaded catalog
    pub fn with_catalog(config: Config, catalog: RightCatalog) -> Self {
        debug!("Rights catalog holds {} rights", catalog.len());
        let cache = ResolverCache::from_config(config.cache()).map(Arc::new);
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &RightCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> Option<&ResolverCache> {
        self.cache.as_deref()
    }

    /// Load and validate a JSON snapshot with the configured depth bound
    pub async fn load_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<Snapshot> {
        Snapshot::from_path(path, self.config.hierarchy(), &self.catalog).await
    }

    pub fn resolver<'a>(&'a self, snapshot: &'a Snapshot) -> RightsResolver<'a> {
        snapshot.resolver(&self.catalog, self.cache())
    }

    pub fn validator<'a>(&'a self, snapshot: &'a Snapshot) -> DelegationValidator<'a> {
        DelegationValidator::new(self.resolver(snapshot))
    }

    /// Forget memoized results after out-of-band data changes
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}
