//! Perimeter hierarchy configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Hierarchy traversal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Maximum number of parent hops before a traversal is reported as cyclic
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Warn when a perimeter's level is not its parent's level plus one
    #[serde(default = "default_true")]
    pub warn_on_level_mismatch: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            warn_on_level_mismatch: true,
        }
    }
}

impl HierarchyConfig {
    /// Merge hierarchy configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.max_depth != default_max_depth() {
            self.max_depth = other.max_depth;
        }
        if !other.warn_on_level_mismatch {
            self.warn_on_level_mismatch = other.warn_on_level_mismatch;
        }
        self
    }
}
