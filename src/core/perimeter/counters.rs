//! Recomputation of the cached allowed-user counters

use super::hierarchy::PerimeterHierarchy;
use super::types::AllowedUsersCounters;
use crate::core::access::Access;
use crate::core::models::{PerimeterId, ProfileId, Timestamp};
use crate::utils::error::Result;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

impl PerimeterHierarchy {
    /// Count distinct profiles with a valid access on, above, and below each perimeter
    pub fn count_allowed_users(
        &self,
        accesses: &[Access],
        at: Timestamp,
    ) -> Result<BTreeMap<PerimeterId, AllowedUsersCounters>> {
        let mut direct: HashMap<PerimeterId, HashSet<ProfileId>> = HashMap::new();
        for access in accesses.iter().filter(|a| a.is_valid(at)) {
            self.get(access.perimeter_id)?;
            direct
                .entry(access.perimeter_id)
                .or_default()
                .insert(access.profile_id);
        }

        let distinct = |ids: &mut dyn Iterator<Item = PerimeterId>| -> u64 {
            let profiles: HashSet<&ProfileId> = ids
                .filter_map(|id| direct.get(&id))
                .flatten()
                .collect();
            profiles.len() as u64
        };

        let mut counters = BTreeMap::new();
        for perimeter in self.perimeters() {
            let above = self.ancestors(perimeter.id)?;
            let below = self.descendants(perimeter.id)?;
            counters.insert(
                perimeter.id,
                AllowedUsersCounters {
                    count_allowed_users: direct.get(&perimeter.id).map_or(0, |p| p.len() as u64),
                    count_allowed_users_above_levels: distinct(
                        &mut above.iter().map(|p| p.id),
                    ),
                    count_allowed_users_inferior_levels: distinct(&mut below.iter().copied()),
                },
            );
        }

        debug!("Recomputed allowed-user counters for {} perimeters", counters.len());
        Ok(counters)
    }

    /// Recompute and store the cached counters on every perimeter
    pub fn refresh_counters(&mut self, accesses: &[Access], at: Timestamp) -> Result<()> {
        let counters = self.count_allowed_users(accesses, at)?;
        for (id, value) in counters {
            if let Some(perimeter) = self.perimeters.get_mut(&id) {
                perimeter.count_allowed_users = value.count_allowed_users;
                perimeter.count_allowed_users_above_levels = value.count_allowed_users_above_levels;
                perimeter.count_allowed_users_inferior_levels =
                    value.count_allowed_users_inferior_levels;
            }
        }
        Ok(())
    }
}
