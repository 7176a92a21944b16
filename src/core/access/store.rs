//! Access record store collaborator and its in-memory snapshot implementation

use super::roles::RoleRegistry;
use super::types::{Access, Profile, Role};
use crate::core::models::{AccessId, PerimeterId, ProfileId, RoleId, Timestamp, next_revision};
use crate::utils::error::{Result, RightsError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// Read API the resolver consumes; persistence lives behind it
#[cfg_attr(test, mockall::automock)]
pub trait AccessStore: Send + Sync {
    /// Accesses of a profile that are valid at `at`
    fn valid_accesses_for_profile(&self, profile_id: ProfileId, at: Timestamp) -> Vec<Access>;

    /// Every access valid at `at`
    fn valid_accesses(&self, at: Timestamp) -> Vec<Access>;

    /// Usable profiles of a user
    fn profiles_for_user(&self, user_id: &str) -> Vec<ProfileId>;

    /// Revision renewed on every mutation and unique across stores in the
    /// process; part of memoization keys
    fn version(&self) -> u64;
}

/// Access creation request referencing its role by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub id: AccessId,
    pub profile_id: ProfileId,
    pub role_id: RoleId,
    pub perimeter_id: PerimeterId,
    pub start_datetime: Timestamp,
    #[serde(default)]
    pub end_datetime: Option<Timestamp>,
    #[serde(default)]
    pub delete_datetime: Option<Timestamp>,
}

/// In-memory access store
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccessStore {
    roles: RoleRegistry,
    profiles: HashMap<ProfileId, Profile>,
    accesses: BTreeMap<AccessId, Access>,
    version: u64,
}

impl InMemoryAccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn add_role(&mut self, role: Role) -> Result<Arc<Role>> {
        let role = self.roles.insert(role)?;
        self.bump();
        Ok(role)
    }

    pub fn update_role(&mut self, role: Role) -> Result<Arc<Role>> {
        let role = self.roles.update(role)?;
        self.refresh_role(&role);
        self.bump();
        Ok(role)
    }

    /// Soft-delete a role; its accesses stop contributing
    pub fn delete_role(&mut self, id: RoleId, at: Timestamp) -> Result<Arc<Role>> {
        let role = self.roles.soft_delete(id, at)?;
        self.refresh_role(&role);
        self.bump();
        Ok(role)
    }

    pub fn add_profile(&mut self, profile: Profile) -> Result<()> {
        if self.profiles.contains_key(&profile.id) {
            return Err(RightsError::conflict(format!(
                "Duplicate profile id {}",
                profile.id
            )));
        }
        self.profiles.insert(profile.id, profile);
        self.bump();
        Ok(())
    }

    pub fn profile(&self, id: ProfileId) -> Result<&Profile> {
        self.profiles
            .get(&id)
            .ok_or_else(|| RightsError::not_found(format!("Profile {}", id)))
    }

    pub fn deactivate_profile(&mut self, id: ProfileId) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(&id)
            .ok_or_else(|| RightsError::not_found(format!("Profile {}", id)))?;
        profile.is_active = false;
        self.bump();
        Ok(())
    }

    /// Record a new access; its profile and role must be registered
    pub fn grant(&mut self, grant: AccessGrant) -> Result<&Access> {
        if self.accesses.contains_key(&grant.id) {
            return Err(RightsError::conflict(format!(
                "Duplicate access id {}",
                grant.id
            )));
        }
        self.profile(grant.profile_id)?;
        let role = Arc::clone(self.roles.get(grant.role_id)?);

        if let Some(end) = grant.end_datetime {
            if end < grant.start_datetime {
                return Err(RightsError::validation(format!(
                    "Access {} ends before it starts",
                    grant.id
                )));
            }
        }

        let mut access = Access::new(
            grant.id,
            grant.profile_id,
            role,
            grant.perimeter_id,
            grant.start_datetime,
        );
        access.end_datetime = grant.end_datetime;
        if let Some(at) = grant.delete_datetime {
            access.soft_delete(at);
        }

        debug!(
            "Granting access {} to profile {} on perimeter {}",
            access.id, access.profile_id, access.perimeter_id
        );
        self.bump();
        Ok(self.accesses.entry(grant.id).or_insert(access))
    }

    /// End an access early
    pub fn revoke_access(&mut self, id: AccessId, at: Timestamp) -> Result<()> {
        self.access_mut(id)?.revoke(at);
        info!("Access {} revoked at {}", id, at);
        self.bump();
        Ok(())
    }

    pub fn delete_access(&mut self, id: AccessId, at: Timestamp) -> Result<()> {
        self.access_mut(id)?.soft_delete(at);
        self.bump();
        Ok(())
    }

    pub fn access(&self, id: AccessId) -> Result<&Access> {
        self.accesses
            .get(&id)
            .ok_or_else(|| RightsError::not_found(format!("Access {}", id)))
    }

    /// Every stored access, valid or not, sorted by id
    pub fn accesses(&self) -> impl Iterator<Item = &Access> {
        self.accesses.values()
    }

    fn access_mut(&mut self, id: AccessId) -> Result<&mut Access> {
        self.accesses
            .get_mut(&id)
            .ok_or_else(|| RightsError::not_found(format!("Access {}", id)))
    }

    fn refresh_role(&mut self, role: &Arc<Role>) {
        for access in self.accesses.values_mut() {
            if access.role.id == role.id {
                access.role = Arc::clone(role);
            }
        }
    }

    fn counts(&self, access: &Access, at: Timestamp) -> bool {
        access.is_valid(at)
            && access.role.is_active()
            && self
                .profiles
                .get(&access.profile_id)
                .is_some_and(Profile::is_usable)
    }

    fn bump(&mut self) {
        self.version = next_revision();
    }
}

impl AccessStore for InMemoryAccessStore {
    fn valid_accesses_for_profile(&self, profile_id: ProfileId, at: Timestamp) -> Vec<Access> {
        self.accesses
            .values()
            .filter(|access| access.profile_id == profile_id && self.counts(access, at))
            .cloned()
            .collect()
    }

    fn valid_accesses(&self, at: Timestamp) -> Vec<Access> {
        self.accesses
            .values()
            .filter(|access| self.counts(access, at))
            .cloned()
            .collect()
    }

    fn profiles_for_user(&self, user_id: &str) -> Vec<ProfileId> {
        let mut ids: Vec<_> = self
            .profiles
            .values()
            .filter(|profile| profile.user_id == user_id && profile.is_usable())
            .map(|profile| profile.id)
            .collect();
        ids.sort();
        ids
    }

    fn version(&self) -> u64 {
        self.version
    }
}
