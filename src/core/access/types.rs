//! Role, profile and access type definitions

use crate::core::catalog::RightCatalog;
use crate::core::models::{
    AccessId, Lifecycle, PerimeterId, ProfileId, RightName, RoleId, Timestamp,
};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named bundle of right flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Unique among active roles
    pub name: String,
    /// Right name to granted flag
    #[serde(default)]
    pub rights: BTreeMap<RightName, bool>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Role {
    pub fn new<I, S>(id: impl Into<RoleId>, name: impl Into<String>, rights: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            rights: rights.into_iter().map(|(r, g)| (r.into(), g)).collect(),
            lifecycle: Lifecycle::Active,
        }
    }

    /// Role granting exactly the listed rights
    pub fn granting(id: impl Into<RoleId>, name: impl Into<String>, rights: &[&str]) -> Self {
        Self::new(id, name, rights.iter().map(|r| (*r, true)))
    }

    /// Rights whose flag is set
    pub fn granted_rights(&self) -> impl Iterator<Item = &RightName> {
        self.rights
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(name, _)| name)
    }

    pub fn grants(&self, right: &str) -> bool {
        self.rights.get(right).copied().unwrap_or(false)
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Every flag, granted or not, must name a catalog right
    pub fn validate(&self, catalog: &RightCatalog) -> Result<()> {
        for name in self.rights.keys() {
            catalog.get(name)?;
        }
        Ok(())
    }
}

/// Activation context of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

fn default_active() -> bool {
    true
}

impl Profile {
    pub fn new(id: impl Into<ProfileId>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            is_active: true,
            lifecycle: Lifecycle::Active,
        }
    }

    /// Whether accesses held by this profile may count at all
    pub fn is_usable(&self) -> bool {
        self.is_active && self.lifecycle.is_active()
    }
}

/// Time-bounded grant of a role to a profile on a perimeter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    pub id: AccessId,
    pub profile_id: ProfileId,
    pub role: Arc<Role>,
    pub perimeter_id: PerimeterId,
    pub start_datetime: Timestamp,
    /// `None` means open-ended
    pub end_datetime: Option<Timestamp>,
    pub lifecycle: Lifecycle,
}

impl Access {
    pub fn new(
        id: impl Into<AccessId>,
        profile_id: impl Into<ProfileId>,
        role: Arc<Role>,
        perimeter_id: impl Into<PerimeterId>,
        start_datetime: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            profile_id: profile_id.into(),
            role,
            perimeter_id: perimeter_id.into(),
            start_datetime,
            end_datetime: None,
            lifecycle: Lifecycle::Active,
        }
    }

    pub fn ending_at(mut self, end_datetime: Timestamp) -> Self {
        self.end_datetime = Some(end_datetime);
        self
    }

    /// Not deleted, started, and not yet ended at `at`
    pub fn is_valid(&self, at: Timestamp) -> bool {
        self.lifecycle.is_active()
            && self.start_datetime <= at
            && self.end_datetime.is_none_or(|end| end > at)
    }

    /// End the access early; an already earlier end is kept
    pub fn revoke(&mut self, at: Timestamp) {
        self.end_datetime = Some(match self.end_datetime {
            Some(end) if end < at => end,
            _ => at,
        });
    }

    pub fn soft_delete(&mut self, at: Timestamp) {
        if self.lifecycle.is_active() {
            self.lifecycle = Lifecycle::Deleted { at };
        }
    }
}
