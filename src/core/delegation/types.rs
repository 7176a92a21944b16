//! Delegation decision types

use crate::core::models::RightName;
use serde::{Deserialize, Serialize};

/// Why a grant was allowed or refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantReason {
    /// The requester holds the full administration right
    FullAdmin,
    /// Every right of the role is covered by a held meta-right
    Authorized,
    /// The role confers no effective right
    EmptyRole,
    /// At least one right of the role is not covered
    MissingMetaRights,
}

/// Outcome of a delegation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantCheck {
    pub granted: bool,
    /// Rights of the role the requester may not delegate, sorted
    pub denied_rights: Vec<RightName>,
    pub reason: GrantReason,
}

impl GrantCheck {
    pub(super) fn allowed(reason: GrantReason) -> Self {
        Self {
            granted: true,
            denied_rights: Vec::new(),
            reason,
        }
    }

    pub(super) fn refused(reason: GrantReason, denied_rights: Vec<RightName>) -> Self {
        Self {
            granted: false,
            denied_rights,
            reason,
        }
    }
}
