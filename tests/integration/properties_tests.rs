//! Property tests over random access sets on the hospital hierarchy

#[cfg(test)]
mod tests {
    use crate::common::{HierarchyFactory, StoreBuilder, t0};
    use perimeter_rights::core::models::{PerimeterId, ProfileId, RightSet};
    use perimeter_rights::{AccessStore, InMemoryAccessStore, RightCatalog, RightsResolver};
    use proptest::prelude::*;

    const PROFILE: i64 = 10;

    /// Role bundles the generated accesses draw from
    const ROLES: &[&[&str]] = &[
        &["right_read_patient_pseudonymized"],
        &["right_read_patient_nominative"],
        &["right_search_patients_by_ipp"],
        &["right_manage_data_accesses_same_level", "right_read_users"],
        &["right_manage_data_accesses_inferior_levels"],
        &["right_read_admin_accesses_same_level"],
        &["right_export_csv_pseudonymized", "right_read_data_accesses_inferior_levels"],
        &["right_full_admin"],
    ];

    fn store(grants: &[(usize, usize)]) -> InMemoryAccessStore {
        let mut builder = StoreBuilder::new().profile(PROFILE, "jdoe");
        for (index, rights) in ROLES.iter().enumerate() {
            builder = builder.role(index as i64, &format!("role{}", index), rights);
        }
        for (role, perimeter) in grants {
            builder = builder.access(
                PROFILE,
                *role as i64,
                HierarchyFactory::HOSPITAL_IDS[*perimeter],
            );
        }
        builder.build()
    }

    fn rights(
        catalog: &RightCatalog,
        store: &InMemoryAccessStore,
        perimeter: i64,
    ) -> RightSet {
        let hierarchy = HierarchyFactory::hospital();
        RightsResolver::new(catalog, &hierarchy, store)
            .effective_rights(ProfileId::new(PROFILE), PerimeterId::new(perimeter), t0())
            .unwrap()
    }

    fn grant_sets() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec(
            (0..ROLES.len(), 0..HierarchyFactory::HOSPITAL_IDS.len()),
            0..8,
        )
    }

    proptest! {
        #[test]
        fn prop_resolved_sets_are_closed(grants in grant_sets(), target in 0..8usize) {
            let catalog = RightCatalog::builtin().unwrap();
            let store = store(&grants);
            let resolved = rights(&catalog, &store, HierarchyFactory::HOSPITAL_IDS[target]);

            for name in &resolved {
                if let Some(dependency) = &catalog.get(name).unwrap().depends_on {
                    prop_assert!(resolved.contains(dependency));
                }
            }
        }

        #[test]
        fn prop_resolution_is_idempotent(grants in grant_sets(), target in 0..8usize) {
            let catalog = RightCatalog::builtin().unwrap();
            let store = store(&grants);
            let perimeter = HierarchyFactory::HOSPITAL_IDS[target];
            prop_assert_eq!(
                rights(&catalog, &store, perimeter),
                rights(&catalog, &store, perimeter)
            );
        }

        #[test]
        fn prop_more_accesses_never_remove_rights(
            grants in grant_sets(),
            extra in grant_sets(),
            target in 0..8usize,
        ) {
            let catalog = RightCatalog::builtin().unwrap();
            let perimeter = HierarchyFactory::HOSPITAL_IDS[target];
            let before = rights(&catalog, &store(&grants), perimeter);

            let mut all = grants.clone();
            all.extend(extra);
            let after = rights(&catalog, &store(&all), perimeter);

            prop_assert!(before.is_subset(&after));
        }

        #[test]
        fn prop_inferior_rights_reach_descendants(grants in grant_sets()) {
            let catalog = RightCatalog::builtin().unwrap();
            let hierarchy = HierarchyFactory::hospital();
            let store = store(&grants);
            let resolver = RightsResolver::new(&catalog, &hierarchy, &store);

            for access in store.valid_accesses(t0()) {
                let conferred = resolver.access_rights(&access).unwrap();
                let propagating = conferred
                    .iter()
                    .filter(|name| catalog.get(name).unwrap().impact_inferior_levels);
                let below = hierarchy.descendants(access.perimeter_id).unwrap();

                for name in propagating {
                    for perimeter in &below {
                        let at_descendant = resolver
                            .effective_rights(ProfileId::new(PROFILE), *perimeter, t0())
                            .unwrap();
                        prop_assert!(at_descendant.contains(name));
                    }
                }
            }
        }
    }
}
