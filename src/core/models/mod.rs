//! Core data models shared across the engine

pub mod ids;
pub mod lifecycle;

pub use ids::{AccessId, PerimeterId, ProfileId, RoleId};
pub use lifecycle::Lifecycle;

/// Evaluation instant used for validity windows
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Name of an atomic right, unique in the catalog
pub type RightName = String;

/// Ordered set of right names, so resolved sets iterate deterministically
pub type RightSet = std::collections::BTreeSet<RightName>;

static REVISIONS: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Process-wide revision stamp; no two calls return the same value
pub fn next_revision() -> u64 {
    REVISIONS.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
}
