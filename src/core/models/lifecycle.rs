//! Soft-delete lifecycle shared by roles, profiles and accesses

use super::Timestamp;
use serde::{Deserialize, Serialize};

/// Records are never hard-deleted; they move to `Deleted` with a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted {
        at: Timestamp,
    },
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    pub fn is_deleted(&self) -> bool {
        !self.is_active()
    }

    /// When the record was deleted, if it was
    pub fn deleted_at(&self) -> Option<Timestamp> {
        match self {
            Lifecycle::Active => None,
            Lifecycle::Deleted { at } => Some(*at),
        }
    }

    /// Build from a nullable delete timestamp column
    pub fn from_delete_datetime(delete_datetime: Option<Timestamp>) -> Self {
        match delete_datetime {
            None => Lifecycle::Active,
            Some(at) => Lifecycle::Deleted { at },
        }
    }
}
