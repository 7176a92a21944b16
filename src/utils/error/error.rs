//! Error handling for the rights engine
//!
//! This module defines all error types used throughout the engine. Authorization
//! denial is never an error: checks return `false` instead.

use crate::core::models::{PerimeterId, RoleId};
use thiserror::Error;

/// Result type alias for the rights engine
pub type Result<T> = std::result::Result<T, RightsError>;

/// Main error type for the rights engine
#[derive(Error, Debug)]
pub enum RightsError {
    /// A right name that is not part of the catalog
    #[error("Unknown right: {0}")]
    UnknownRight(String),

    /// A perimeter id that is not part of the hierarchy snapshot
    #[error("Unknown perimeter: {0}")]
    UnknownPerimeter(PerimeterId),

    /// Parent traversal did not terminate within the configured depth
    #[error("Cyclic perimeter hierarchy detected from perimeter {perimeter} (max depth {max_depth})")]
    CyclicHierarchy {
        perimeter: PerimeterId,
        max_depth: usize,
    },

    /// A role id that is not part of the registry
    #[error("Unknown role: {0}")]
    UnknownRole(RoleId),

    /// Catalog document failed load-time validation
    #[error("Invalid rights catalog: {0}")]
    InvalidCatalog(String),

    /// Uniqueness violations
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Coarse classification used by operators and callers to route failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller passed an id or name that does not exist
    CallerBug,
    /// The snapshot itself is malformed and must be rejected upstream
    DataIntegrity,
    /// Configuration could not be loaded or is invalid
    Configuration,
    /// Filesystem or decoding failures
    Io,
}

impl RightsError {
    pub fn invalid_catalog<S: Into<String>>(message: S) -> Self {
        Self::InvalidCatalog(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn unknown_right<S: Into<String>>(name: S) -> Self {
        Self::UnknownRight(name.into())
    }

    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            RightsError::UnknownRight(_)
            | RightsError::UnknownPerimeter(_)
            | RightsError::UnknownRole(_)
            | RightsError::NotFound(_)
            | RightsError::Validation(_) => ErrorCategory::CallerBug,
            RightsError::CyclicHierarchy { .. }
            | RightsError::InvalidCatalog(_)
            | RightsError::Conflict(_) => ErrorCategory::DataIntegrity,
            RightsError::Config(_) => ErrorCategory::Configuration,
            RightsError::Io(_) | RightsError::Serialization(_) | RightsError::Yaml(_) => {
                ErrorCategory::Io
            }
        }
    }

    /// Whether the snapshot that produced this error should be rejected
    pub fn is_data_integrity(&self) -> bool {
        self.category() == ErrorCategory::DataIntegrity
    }
}
