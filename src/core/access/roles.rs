//! Role registry enforcing name uniqueness among active roles

use super::types::Role;
use crate::core::models::{Lifecycle, RoleId, Timestamp};
use crate::utils::error::{Result, RightsError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Roles by id; soft-deleted roles stay registered
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: BTreeMap<RoleId, Arc<Role>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role
    pub fn insert(&mut self, role: Role) -> Result<Arc<Role>> {
        if self.roles.contains_key(&role.id) {
            return Err(RightsError::conflict(format!("Duplicate role id {}", role.id)));
        }
        self.check_name_available(&role)?;

        debug!("Registering role {} ({})", role.name, role.id);
        let role = Arc::new(role);
        self.roles.insert(role.id, Arc::clone(&role));
        Ok(role)
    }

    /// Replace an existing role's name and rights
    pub fn update(&mut self, role: Role) -> Result<Arc<Role>> {
        let current = self.get(role.id)?;
        if current.lifecycle.is_deleted() {
            return Err(RightsError::validation(format!(
                "Role {} is deleted and cannot be edited",
                role.id
            )));
        }
        let role = Role {
            lifecycle: current.lifecycle,
            ..role
        };
        self.check_name_available(&role)?;

        let role = Arc::new(role);
        self.roles.insert(role.id, Arc::clone(&role));
        Ok(role)
    }

    /// Mark a role deleted; deleting twice keeps the first timestamp
    pub fn soft_delete(&mut self, id: RoleId, at: Timestamp) -> Result<Arc<Role>> {
        let current = self.get(id)?;
        if current.lifecycle.is_deleted() {
            return Ok(Arc::clone(current));
        }

        info!("Soft-deleting role {} ({})", current.name, id);
        let role = Arc::new(Role {
            lifecycle: Lifecycle::Deleted { at },
            ..Role::clone(current)
        });
        self.roles.insert(id, Arc::clone(&role));
        Ok(role)
    }

    pub fn get(&self, id: RoleId) -> Result<&Arc<Role>> {
        self.roles.get(&id).ok_or(RightsError::UnknownRole(id))
    }

    /// Active role carrying a name
    pub fn active_by_name(&self, name: &str) -> Option<&Arc<Role>> {
        self.active().find(|role| role.name == name)
    }

    /// Active roles, sorted by id
    pub fn active(&self) -> impl Iterator<Item = &Arc<Role>> {
        self.roles.values().filter(|role| role.is_active())
    }

    /// Every role, deleted ones included
    pub fn all(&self) -> impl Iterator<Item = &Arc<Role>> {
        self.roles.values()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    fn check_name_available(&self, role: &Role) -> Result<()> {
        if !role.is_active() {
            return Ok(());
        }
        match self.active_by_name(&role.name) {
            Some(existing) if existing.id != role.id => Err(RightsError::conflict(format!(
                "An active role named {} already exists ({})",
                role.name, existing.id
            ))),
            _ => Ok(()),
        }
    }
}
