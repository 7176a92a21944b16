//! Effective rights of a profile on a perimeter

use super::cache::ResolverCache;
use crate::core::access::{Access, AccessStore};
use crate::core::catalog::RightCatalog;
use crate::core::models::{PerimeterId, ProfileId, RightSet, Timestamp};
use crate::core::perimeter::PerimeterHierarchy;
use crate::utils::error::Result;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Pure evaluation over a catalog, a hierarchy snapshot and an access store
#[derive(Clone, Copy)]
pub struct RightsResolver<'a> {
    catalog: &'a RightCatalog,
    hierarchy: &'a PerimeterHierarchy,
    store: &'a dyn AccessStore,
    cache: Option<&'a ResolverCache>,
}

impl<'a> RightsResolver<'a> {
    pub fn new(
        catalog: &'a RightCatalog,
        hierarchy: &'a PerimeterHierarchy,
        store: &'a dyn AccessStore,
    ) -> Self {
        Self {
            catalog,
            hierarchy,
            store,
            cache: None,
        }
    }

    /// Memoize `effective_rights` results in `cache`
    ///
    /// Instants are floored to the cache granularity: an access whose validity
    /// changes inside a bucket keeps the state seen at the bucket's first
    /// evaluation until the bucket rolls over.
    pub fn with_cache(mut self, cache: &'a ResolverCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn catalog(&self) -> &'a RightCatalog {
        self.catalog
    }

    pub fn hierarchy(&self) -> &'a PerimeterHierarchy {
        self.hierarchy
    }

    /// Accesses of a profile that count at `at`, re-checked against the store's answer
    pub fn valid_accesses(&self, profile_id: ProfileId, at: Timestamp) -> Vec<Access> {
        self.store
            .valid_accesses_for_profile(profile_id, at)
            .into_iter()
            .filter(|access| access.is_valid(at) && access.role.is_active())
            .collect()
    }

    /// Rights a profile holds on `target` at `at`
    pub fn effective_rights(
        &self,
        profile_id: ProfileId,
        target: PerimeterId,
        at: Timestamp,
    ) -> Result<RightSet> {
        let Some(cache) = self.cache else {
            return self.compute(profile_id, target, at);
        };

        let key = cache.key(
            profile_id,
            target,
            at,
            self.store.version(),
            self.hierarchy.revision(),
        );
        if let Some(rights) = cache.get(&key) {
            return Ok(RightSet::clone(&rights));
        }
        let rights = self.compute(profile_id, target, at)?;
        cache.insert(key, Arc::new(rights.clone()));
        Ok(rights)
    }

    fn compute(&self, profile_id: ProfileId, target: PerimeterId, at: Timestamp) -> Result<RightSet> {
        let above: HashSet<PerimeterId> = self
            .hierarchy
            .ancestors(target)?
            .into_iter()
            .map(|perimeter| perimeter.id)
            .collect();
        let accesses = self.valid_accesses(profile_id, at);

        let mut union = RightSet::new();
        for access in &accesses {
            let on_target = access.perimeter_id == target;
            let on_ancestor = above.contains(&access.perimeter_id);
            for name in access.role.granted_rights() {
                let right = self.catalog.get(name)?;
                if right.is_global
                    || on_target
                    || (on_ancestor && right.impact_inferior_levels)
                {
                    union.insert(right.name.clone());
                }
            }
        }

        let rights = self.catalog.effective_closure(&union)?;
        debug!(
            "Profile {} on perimeter {}: {} accesses, {} granted, {} effective",
            profile_id,
            target,
            accesses.len(),
            union.len(),
            rights.len()
        );
        Ok(rights)
    }

    /// Union of the rights of every usable profile of a user
    pub fn effective_rights_for_user(
        &self,
        user_id: &str,
        target: PerimeterId,
        at: Timestamp,
    ) -> Result<RightSet> {
        let mut rights = RightSet::new();
        for profile_id in self.store.profiles_for_user(user_id) {
            rights.extend(self.effective_rights(profile_id, target, at)?);
        }
        Ok(rights)
    }

    /// Non-empty effective rights of a profile on every perimeter
    pub fn rights_by_perimeter(
        &self,
        profile_id: ProfileId,
        at: Timestamp,
    ) -> Result<BTreeMap<PerimeterId, RightSet>> {
        let mut by_perimeter = BTreeMap::new();
        for perimeter in self.hierarchy.perimeters() {
            let rights = self.effective_rights(profile_id, perimeter.id, at)?;
            if !rights.is_empty() {
                by_perimeter.insert(perimeter.id, rights);
            }
        }
        Ok(by_perimeter)
    }

    /// Rights conferred by one access's role, wherever they apply
    pub fn access_rights(&self, access: &Access) -> Result<RightSet> {
        self.catalog.effective_closure(access.role.granted_rights())
    }
}
