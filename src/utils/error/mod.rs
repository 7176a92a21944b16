//! Error handling utilities
//!
//! This module provides the error taxonomy shared by every engine component.

pub mod error;

// Re-export commonly used types
pub use error::*;
