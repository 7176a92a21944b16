//! Utility modules for the rights engine
//!
//! ## Module Organization
//!
//! - **error**: Error taxonomy and classification
//! - **logging**: Tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{ErrorCategory, Result, RightsError};
pub use logging::LogLevel;
