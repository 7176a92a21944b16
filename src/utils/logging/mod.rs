//! Logging utilities
//!
//! This module provides tracing subscriber installation and the log level type
//! used in configuration.

pub mod logging;

pub use logging::{LogLevel, env_filter, init_tracing};
