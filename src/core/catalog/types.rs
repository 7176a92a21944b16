//! Catalog type definitions

use crate::core::models::RightName;
use serde::{Deserialize, Serialize};

/// Atomic right definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Right {
    /// Unique right name
    pub name: RightName,
    /// Human readable label
    #[serde(default)]
    pub label: String,
    /// Category used to look up the delegation rule
    pub category: String,
    /// Applies regardless of the perimeter of the access carrying it
    #[serde(default)]
    pub is_global: bool,
    /// Propagates from an access perimeter to all its descendants
    #[serde(default)]
    pub impact_inferior_levels: bool,
    #[serde(default)]
    pub allow_edit_accesses_on_same_level: bool,
    #[serde(default)]
    pub allow_edit_accesses_on_inf_levels: bool,
    #[serde(default)]
    pub allow_read_accesses_on_same_level: bool,
    #[serde(default)]
    pub allow_read_accesses_on_inf_levels: bool,
    /// Right this one requires; holding the target also implies this right
    #[serde(default)]
    pub depends_on: Option<RightName>,
}

impl Right {
    /// Minimal perimeter-scoped right, mostly useful to build catalogs in code
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            category: category.into(),
            is_global: false,
            impact_inferior_levels: false,
            allow_edit_accesses_on_same_level: false,
            allow_edit_accesses_on_inf_levels: false,
            allow_read_accesses_on_same_level: false,
            allow_read_accesses_on_inf_levels: false,
            depends_on: None,
        }
    }

    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    pub fn impacting_inferior_levels(mut self) -> Self {
        self.impact_inferior_levels = true;
        self
    }

    pub fn editing_same_level(mut self) -> Self {
        self.allow_edit_accesses_on_same_level = true;
        self
    }

    pub fn editing_inferior_levels(mut self) -> Self {
        self.allow_edit_accesses_on_inf_levels = true;
        self
    }

    pub fn reading_same_level(mut self) -> Self {
        self.allow_read_accesses_on_same_level = true;
        self
    }

    pub fn reading_inferior_levels(mut self) -> Self {
        self.allow_read_accesses_on_inf_levels = true;
        self
    }

    pub fn depending_on(mut self, target: impl Into<String>) -> Self {
        self.depends_on = Some(target.into());
        self
    }
}

/// Meta-rights required to delegate rights of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRule {
    pub category: String,
    /// Required, on any perimeter, to grant the category's global rights
    #[serde(default)]
    pub manage_global: Option<RightName>,
    /// Required on the target perimeter itself
    #[serde(default)]
    pub manage_same_level: Option<RightName>,
    /// Required on a strict ancestor of the target perimeter
    #[serde(default)]
    pub manage_inferior_levels: Option<RightName>,
    #[serde(default)]
    pub read_same_level: Option<RightName>,
    #[serde(default)]
    pub read_inferior_levels: Option<RightName>,
}

impl DelegationRule {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            manage_global: None,
            manage_same_level: None,
            manage_inferior_levels: None,
            read_same_level: None,
            read_inferior_levels: None,
        }
    }

    /// Every right name the rule references
    pub fn referenced_rights(&self) -> impl Iterator<Item = &RightName> {
        [
            &self.manage_global,
            &self.manage_same_level,
            &self.manage_inferior_levels,
            &self.read_same_level,
            &self.read_inferior_levels,
        ]
        .into_iter()
        .flatten()
    }

    /// Any manage meta-right of this rule, whatever its level
    pub fn manage_rights(&self) -> impl Iterator<Item = &RightName> {
        [
            &self.manage_global,
            &self.manage_same_level,
            &self.manage_inferior_levels,
        ]
        .into_iter()
        .flatten()
    }
}

/// Serialized catalog: rights plus the delegation lookup table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub rights: Vec<Right>,
    #[serde(default)]
    pub delegation: Vec<DelegationRule>,
}
