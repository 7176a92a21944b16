//! # Perimeter Rights
//!
//! Hierarchical rights resolution over organizational perimeters.
//!
//! ## Features
//!
//! - **Right Catalog**: atomic rights with scope flags, `depends_on` edges and a
//!   delegation lookup table
//! - **Perimeter Hierarchy**: bounded ancestor and descendant traversal that
//!   reports cyclic data instead of looping
//! - **Rights Resolver**: effective rights of a profile on a perimeter, honouring
//!   validity windows, global rights and inferior-level propagation
//! - **Delegation Validator**: whether a requester may grant a role on a perimeter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use perimeter_rights::{Config, RightsEngine};
//! use perimeter_rights::core::models::{PerimeterId, ProfileId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = RightsEngine::new(Config::from_env()?).await?;
//!     let snapshot = engine.load_snapshot("snapshot.json").await?;
//!
//!     let rights = engine.resolver(&snapshot).effective_rights(
//!         ProfileId::new(1),
//!         PerimeterId::new(42),
//!         chrono::Utc::now(),
//!     )?;
//!     println!("{:?}", rights);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use crate::core::RightsEngine;
pub use crate::core::access::{Access, AccessGrant, AccessStore, InMemoryAccessStore, Profile, Role};
pub use crate::core::catalog::{FULL_ADMIN_RIGHT, Right, RightCatalog};
pub use crate::core::delegation::{DelegationValidator, GrantCheck, GrantReason};
pub use crate::core::perimeter::{Perimeter, PerimeterHierarchy};
pub use crate::core::resolver::{ResolverCache, RightsResolver};
pub use crate::core::snapshot::{Snapshot, SnapshotDocument};
pub use utils::error::{ErrorCategory, Result, RightsError};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
