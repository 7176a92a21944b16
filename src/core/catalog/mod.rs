//! Right catalog
//!
//! Static definition of atomic rights, their scope (`is_global` versus
//! perimeter-scoped), their `depends_on` edges, and the delegation lookup table
//! mapping each right category to the meta-rights needed to grant it.

#[allow(clippy::module_inception)]
mod catalog;
mod types;

pub use catalog::{BUILTIN_CATALOG, FULL_ADMIN_RIGHT, RightCatalog};
pub use types::{CatalogDocument, DelegationRule, Right};
