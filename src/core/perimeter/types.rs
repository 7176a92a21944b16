//! Perimeter type definitions

use crate::core::models::PerimeterId;
use serde::{Deserialize, Serialize};

/// Node of the organizational hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perimeter {
    pub id: PerimeterId,
    pub name: String,
    /// Depth in the hierarchy, roots being level 1
    #[serde(default = "default_level")]
    pub level: u32,
    /// `None` only for roots
    #[serde(default)]
    pub parent_id: Option<PerimeterId>,
    /// Cached counters; read optimizations, never a source of truth
    #[serde(default)]
    pub count_allowed_users: u64,
    #[serde(default)]
    pub count_allowed_users_above_levels: u64,
    #[serde(default)]
    pub count_allowed_users_inferior_levels: u64,
}

fn default_level() -> u32 {
    1
}

impl Perimeter {
    pub fn root(id: impl Into<PerimeterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 1,
            parent_id: None,
            count_allowed_users: 0,
            count_allowed_users_above_levels: 0,
            count_allowed_users_inferior_levels: 0,
        }
    }

    pub fn child(
        id: impl Into<PerimeterId>,
        name: impl Into<String>,
        parent: &Perimeter,
    ) -> Self {
        Self {
            level: parent.level + 1,
            parent_id: Some(parent.id),
            ..Self::root(id, name)
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn counters(&self) -> AllowedUsersCounters {
        AllowedUsersCounters {
            count_allowed_users: self.count_allowed_users,
            count_allowed_users_above_levels: self.count_allowed_users_above_levels,
            count_allowed_users_inferior_levels: self.count_allowed_users_inferior_levels,
        }
    }
}

/// Distinct profiles holding a valid access on, above, or below a perimeter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedUsersCounters {
    pub count_allowed_users: u64,
    pub count_allowed_users_above_levels: u64,
    pub count_allowed_users_inferior_levels: u64,
}
