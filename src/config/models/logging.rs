//! Logging configuration

use crate::utils::logging::LogLevel;
use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Default level, overridden by `RUST_LOG`
    #[serde(default)]
    pub level: LogLevel,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Merge logging configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.level != LogLevel::default() {
            self.level = other.level;
        }
        if other.json {
            self.json = other.json;
        }
        self
    }
}
