//! Rights catalog source configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the rights catalog is loaded from
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Path to a YAML or JSON catalog document; the built-in catalog is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Merge catalog configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.path.is_some() {
            self.path = other.path;
        }
        self
    }
}
