//! Integration tests for perimeter-rights
//!
//! These tests verify the interaction between the engine components
//! over real in-memory data, without mocking.

pub mod config_tests;
pub mod properties_tests;
pub mod scenarios_tests;
