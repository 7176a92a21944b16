//! Materialized perimeter and access snapshot, as handed over by persistence

use crate::config::HierarchyConfig;
use crate::core::access::{AccessGrant, InMemoryAccessStore, Profile, Role};
use crate::core::catalog::RightCatalog;
use crate::core::perimeter::{Perimeter, PerimeterHierarchy};
use crate::core::resolver::{ResolverCache, RightsResolver};
use crate::utils::error::{Result, RightsError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Serialized snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Version of the perimeter data, part of memoization keys
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub perimeters: Vec<Perimeter>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub accesses: Vec<AccessGrant>,
}

/// Validated hierarchy plus access store
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub hierarchy: PerimeterHierarchy,
    pub store: InMemoryAccessStore,
}

impl Snapshot {
    /// Build a snapshot; cyclic perimeter data rejects the whole document
    pub fn from_document(
        document: SnapshotDocument,
        config: &HierarchyConfig,
        catalog: &RightCatalog,
    ) -> Result<Self> {
        let hierarchy =
            PerimeterHierarchy::new(document.perimeters, config)?.with_version(document.version);
        hierarchy.check_acyclic()?;

        let mut store = InMemoryAccessStore::new();
        for role in document.roles {
            role.validate(catalog)?;
            store.add_role(role)?;
        }
        for profile in document.profiles {
            store.add_profile(profile)?;
        }
        for grant in document.accesses {
            if !hierarchy.contains(grant.perimeter_id) {
                return Err(RightsError::UnknownPerimeter(grant.perimeter_id));
            }
            store.grant(grant)?;
        }

        info!(
            "Snapshot loaded: {} perimeters, {} roles, {} accesses",
            hierarchy.len(),
            store.roles().len(),
            store.accesses().count()
        );
        Ok(Self { hierarchy, store })
    }

    pub fn from_json_str(
        content: &str,
        config: &HierarchyConfig,
        catalog: &RightCatalog,
    ) -> Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(content)?;
        Self::from_document(document, config, catalog)
    }

    /// Load a JSON snapshot file
    pub async fn from_path<P: AsRef<Path>>(
        path: P,
        config: &HierarchyConfig,
        catalog: &RightCatalog,
    ) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading snapshot from: {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&content, config, catalog)
    }

    /// Resolver over this snapshot
    pub fn resolver<'a>(
        &'a self,
        catalog: &'a RightCatalog,
        cache: Option<&'a ResolverCache>,
    ) -> RightsResolver<'a> {
        let resolver = RightsResolver::new(catalog, &self.hierarchy, &self.store);
        match cache {
            Some(cache) => resolver.with_cache(cache),
            None => resolver,
        }
    }
}
