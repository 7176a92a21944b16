//! Access record store
//!
//! Roles, profiles and time-bounded accesses, plus the `AccessStore` read API
//! through which the resolver receives materialized access lists.

mod roles;
mod store;
mod types;

pub use roles::RoleRegistry;
#[cfg(test)]
pub use store::MockAccessStore;
pub use store::{AccessGrant, AccessStore, InMemoryAccessStore};
pub use types::{Access, Profile, Role};
