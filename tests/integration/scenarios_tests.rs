//! Reference scenarios driven through the in-memory store

#[cfg(test)]
mod tests {
    use crate::common::{HierarchyFactory, StoreBuilder, t0};
    use chrono::Duration;
    use perimeter_rights::core::access::Role;
    use perimeter_rights::core::models::{PerimeterId, ProfileId};
    use perimeter_rights::{
        DelegationValidator, ErrorCategory, GrantReason, RightCatalog, RightsError, RightsResolver,
    };

    const U: i64 = 10;

    fn profile() -> ProfileId {
        ProfileId::new(U)
    }

    // ==================== Full administration ====================

    #[test]
    fn test_full_admin_can_grant_any_role_anywhere() {
        let catalog = RightCatalog::builtin().unwrap();
        let hierarchy = HierarchyFactory::hospital();
        let store = StoreBuilder::new()
            .role(1, "admin", &["right_full_admin"])
            .profile(U, "admin")
            .access(U, 1, 1)
            .build();
        let validator = DelegationValidator::new(RightsResolver::new(&catalog, &hierarchy, &store));

        let every_right: Vec<&str> = catalog.rights().map(|r| r.name.as_str()).collect();
        let roles = [
            Role::granting(90, "everything", &every_right),
            Role::granting(91, "reader", &["right_read_patient_pseudonymized"]),
            Role::granting(92, "empty", &[]),
        ];
        for role in &roles {
            for id in HierarchyFactory::HOSPITAL_IDS {
                assert!(
                    validator
                        .can_grant(profile(), role, PerimeterId::new(id), t0())
                        .unwrap()
                );
            }
        }
    }

    // ==================== Inferior-level delegation ====================

    #[test]
    fn test_inferior_level_manager_on_parent() {
        let catalog = RightCatalog::builtin().unwrap();
        let hierarchy = HierarchyFactory::hospital();
        let store = StoreBuilder::new()
            .role(1, "data manager", &["right_manage_data_accesses_inferior_levels"])
            .profile(U, "manager")
            .access(U, 1, 2)
            .build();
        let resolver = RightsResolver::new(&catalog, &hierarchy, &store);

        // The catalog declares no dependent of the manage right, so nothing else appears
        let at_child = resolver
            .effective_rights(profile(), PerimeterId::new(4), t0())
            .unwrap();
        assert_eq!(
            at_child.into_iter().collect::<Vec<_>>(),
            vec!["right_manage_data_accesses_inferior_levels"]
        );

        let validator = DelegationValidator::new(resolver);
        let reader = Role::granting(91, "reader", &["right_read_patient_pseudonymized"]);
        assert!(
            validator
                .can_grant(profile(), &reader, PerimeterId::new(4), t0())
                .unwrap()
        );
        assert!(
            validator
                .can_grant(profile(), &reader, PerimeterId::new(6), t0())
                .unwrap()
        );
        assert!(
            !validator
                .can_grant(profile(), &reader, PerimeterId::new(7), t0())
                .unwrap()
        );
    }

    #[test]
    fn test_dependent_right_follows_its_target() {
        let catalog = RightCatalog::builtin().unwrap();
        let hierarchy = HierarchyFactory::hospital();
        let store = StoreBuilder::new()
            .role(1, "access reader", &["right_read_admin_accesses_same_level"])
            .profile(U, "auditor")
            .access(U, 1, 2)
            .build();
        let resolver = RightsResolver::new(&catalog, &hierarchy, &store);

        let rights = resolver
            .effective_rights(profile(), PerimeterId::new(2), t0())
            .unwrap();
        assert!(rights.contains("right_read_accesses_above_levels"));
        assert!(
            resolver
                .effective_rights(profile(), PerimeterId::new(4), t0())
                .unwrap()
                .is_empty()
        );
    }

    // ==================== Temporal validity ====================

    #[test]
    fn test_access_expired_yesterday_is_ignored() {
        let catalog = RightCatalog::builtin().unwrap();
        let hierarchy = HierarchyFactory::hospital();
        let yesterday = t0() - Duration::days(1);
        let store = StoreBuilder::new()
            .role(1, "reader", &["right_read_patient_nominative", "right_read_users"])
            .profile(U, "former")
            .access_until(U, 1, 2, yesterday)
            .build();
        let resolver = RightsResolver::new(&catalog, &hierarchy, &store);

        assert!(
            resolver
                .effective_rights(profile(), PerimeterId::new(2), t0())
                .unwrap()
                .is_empty()
        );
        assert!(
            !resolver
                .effective_rights(profile(), PerimeterId::new(2), yesterday - Duration::hours(1))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_revoked_access_stops_at_revocation() {
        let catalog = RightCatalog::builtin().unwrap();
        let hierarchy = HierarchyFactory::hospital();
        let mut store = StoreBuilder::new()
            .role(1, "reader", &["right_read_users"])
            .profile(U, "jdoe")
            .access(U, 1, 2)
            .build();
        let access_id = store.accesses().next().unwrap().id;
        store.revoke_access(access_id, t0()).unwrap();

        let resolver = RightsResolver::new(&catalog, &hierarchy, &store);
        assert!(
            resolver
                .effective_rights(profile(), PerimeterId::new(2), t0())
                .unwrap()
                .is_empty()
        );
        assert!(
            !resolver
                .effective_rights(profile(), PerimeterId::new(2), t0() - Duration::seconds(1))
                .unwrap()
                .is_empty()
        );
    }

    // ==================== Malformed data ====================

    #[test]
    fn test_cyclic_perimeters_are_reported() {
        let catalog = RightCatalog::builtin().unwrap();
        let hierarchy = HierarchyFactory::cyclic();
        let store = StoreBuilder::new().build();

        let err = hierarchy.ancestors(PerimeterId::new(1)).unwrap_err();
        assert!(matches!(err, RightsError::CyclicHierarchy { .. }));
        assert_eq!(err.category(), ErrorCategory::DataIntegrity);

        let resolver = RightsResolver::new(&catalog, &hierarchy, &store);
        assert!(matches!(
            resolver.effective_rights(profile(), PerimeterId::new(2), t0()),
            Err(RightsError::CyclicHierarchy { .. })
        ));
    }

    #[test]
    fn test_denial_is_not_an_error() {
        let catalog = RightCatalog::builtin().unwrap();
        let hierarchy = HierarchyFactory::hospital();
        let store = StoreBuilder::new().profile(U, "nobody").build();
        let validator = DelegationValidator::new(RightsResolver::new(&catalog, &hierarchy, &store));

        let check = validator
            .explain_grant(
                profile(),
                &Role::granting(91, "reader", &["right_read_patient_pseudonymized"]),
                PerimeterId::new(4),
                t0(),
            )
            .unwrap();
        assert!(!check.granted);
        assert_eq!(check.reason, GrantReason::MissingMetaRights);

        let err = validator
            .can_grant(profile(), &Role::granting(92, "x", &[]), PerimeterId::new(99), t0())
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CallerBug);
    }

    // ==================== Multiple profiles ====================

    #[test]
    fn test_user_rights_union_profiles() {
        let catalog = RightCatalog::builtin().unwrap();
        let hierarchy = HierarchyFactory::hospital();
        let store = StoreBuilder::new()
            .role(1, "reader", &["right_read_patient_pseudonymized"])
            .role(2, "logs", &["right_read_logs"])
            .profile(10, "jdoe")
            .profile(11, "jdoe")
            .access(10, 1, 3)
            .access(11, 2, 5)
            .build();
        let resolver = RightsResolver::new(&catalog, &hierarchy, &store);

        let rights = resolver
            .effective_rights_for_user("jdoe", PerimeterId::new(8), t0())
            .unwrap();
        assert!(rights.contains("right_read_patient_pseudonymized"));
        assert!(rights.contains("right_read_logs"));
    }
}
