//! Perimeter hierarchy
//!
//! Read-only forest of organizational perimeters with bounded ancestor and
//! descendant traversal, plus recomputation of the allowed-user counters.

mod counters;
mod hierarchy;
mod types;

pub use hierarchy::PerimeterHierarchy;
pub use types::{AllowedUsersCounters, Perimeter};
