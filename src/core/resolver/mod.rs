//! Rights resolver
//!
//! Walks the ancestor chain of a target perimeter, keeps the valid accesses of
//! a profile, applies global and `impact_inferior_levels` propagation, and
//! closes the union over the catalog's dependencies.

mod cache;
#[allow(clippy::module_inception)]
mod resolver;

pub use cache::{CacheStats, ResolverCache, ResolverCacheKey};
pub use resolver::RightsResolver;
