//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `engine_validators`: Validators for the engine configuration sections
//! - `tests`: Test suite for all validators

mod engine_validators;
mod trait_def;

pub use trait_def::Validate;
