//! Configuration and engine loading tests

#[cfg(test)]
mod tests {
    use crate::common::{HierarchyFactory, t0};
    use perimeter_rights::config::{CacheConfig, HierarchyConfig};
    use perimeter_rights::core::models::{PerimeterId, ProfileId};
    use perimeter_rights::{Config, RightsEngine, RightsError};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const CATALOG: &str = r#"
rights:
  - name: right_full_admin
    category: administration
    is_global: true
  - name: right_read_ward
    category: ward
    impact_inferior_levels: true
  - name: right_manage_ward_accesses
    category: ward_accesses
    impact_inferior_levels: true
    allow_edit_accesses_on_inf_levels: true
delegation:
  - category: ward
    manage_inferior_levels: right_manage_ward_accesses
"#;

    const SNAPSHOT: &str = r#"{
        "version": 1,
        "perimeters": [
            {"id": 1, "name": "Root"},
            {"id": 2, "name": "Ward", "level": 2, "parent_id": 1}
        ],
        "roles": [
            {"id": 1, "name": "ward reader", "rights": {"right_read_ward": true}},
            {"id": 2, "name": "ward manager", "rights": {"right_manage_ward_accesses": true}}
        ],
        "profiles": [{"id": 10, "user_id": "nurse"}, {"id": 11, "user_id": "head"}],
        "accesses": [
            {"id": 1, "profile_id": 10, "role_id": 1, "perimeter_id": 1,
             "start_datetime": "2024-01-01T00:00:00Z"},
            {"id": 2, "profile_id": 11, "role_id": 2, "perimeter_id": 1,
             "start_datetime": "2024-01-01T00:00:00Z"}
        ]
    }"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_engine_loads_configured_catalog_and_snapshot() {
        let dir = TempDir::new().unwrap();
        let catalog_path = write(&dir, "rights.yaml", CATALOG);
        let snapshot_path = write(&dir, "snapshot.json", SNAPSHOT);
        let config_path = write(
            &dir,
            "engine.yaml",
            &format!(
                "hierarchy:\n  max_depth: 8\ncatalog:\n  path: {}\ncache:\n  enabled: true\n",
                catalog_path.display()
            ),
        );

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.hierarchy().max_depth, 8);

        let engine = RightsEngine::new(config).await.unwrap();
        assert_eq!(engine.catalog().len(), 3);
        assert!(engine.cache().is_some());

        let snapshot = engine.load_snapshot(&snapshot_path).await.unwrap();
        let resolver = engine.resolver(&snapshot);
        let rights = resolver
            .effective_rights(ProfileId::new(10), PerimeterId::new(2), t0())
            .unwrap();
        assert!(rights.contains("right_read_ward"));

        // Served from the memo the second time
        resolver
            .effective_rights(ProfileId::new(10), PerimeterId::new(2), t0())
            .unwrap();
        let stats = engine.cache().unwrap().stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));

        let role = snapshot
            .store
            .roles()
            .active_by_name("ward reader")
            .unwrap()
            .clone();
        let validator = engine.validator(&snapshot);
        assert!(
            validator
                .can_grant(ProfileId::new(11), &role, PerimeterId::new(2), t0())
                .unwrap()
        );
        assert!(
            !validator
                .can_grant(ProfileId::new(10), &role, PerimeterId::new(2), t0())
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_cached_engine_keeps_snapshots_apart() {
        let dir = TempDir::new().unwrap();
        let catalog_path = write(&dir, "rights.yaml", CATALOG);
        let mut config = Config::default();
        config.engine.catalog.path = Some(catalog_path);
        config.engine.cache.enabled = true;
        let engine = RightsEngine::new(config).await.unwrap();

        // Same perimeters, roles, profiles and access ids; only the role's rights differ
        let reader = write(&dir, "reader.json", SNAPSHOT);
        let admin = write(
            &dir,
            "admin.json",
            &SNAPSHOT.replace(
                r#""rights": {"right_read_ward": true}"#,
                r#""rights": {"right_full_admin": true}"#,
            ),
        );
        let reader = engine.load_snapshot(&reader).await.unwrap();
        let admin = engine.load_snapshot(&admin).await.unwrap();

        let (profile, ward) = (ProfileId::new(10), PerimeterId::new(2));
        let from_reader = engine
            .resolver(&reader)
            .effective_rights(profile, ward, t0())
            .unwrap();
        let from_admin = engine
            .resolver(&admin)
            .effective_rights(profile, ward, t0())
            .unwrap();

        assert!(from_reader.contains("right_read_ward"));
        assert!(!from_reader.contains("right_full_admin"));
        assert_eq!(
            from_admin,
            admin
                .resolver(engine.catalog(), None)
                .effective_rights(profile, ward, t0())
                .unwrap()
        );
        assert!(from_admin.contains("right_full_admin"));

        let stats = engine.cache().unwrap().stats();
        assert_eq!((stats.hits, stats.misses), (0, 2));

        // Reloading the same file still yields a distinct snapshot
        let reloaded = engine
            .load_snapshot(dir.path().join("reader.json"))
            .await
            .unwrap();
        engine
            .resolver(&reloaded)
            .effective_rights(profile, ward, t0())
            .unwrap();
        assert_eq!(engine.cache().unwrap().stats().misses, 3);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "hierarchy:\n  max_depth: 0").unwrap();

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, RightsError::Config(_)));
    }

    #[tokio::test]
    async fn test_broken_catalog_is_rejected() {
        let dir = TempDir::new().unwrap();
        let catalog_path = write(
            &dir,
            "rights.yaml",
            "rights:\n  - name: a\n    category: x\n    depends_on: missing\n",
        );

        let mut config = Config::default();
        config.engine.catalog.path = Some(catalog_path);
        assert!(matches!(
            RightsEngine::new(config).await,
            Err(RightsError::UnknownRight(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_max_depth_applies_to_traversals() {
        let config = HierarchyConfig {
            max_depth: 3,
            ..HierarchyConfig::default()
        };
        let shallow = HierarchyFactory::chain(10, &config);
        assert!(matches!(
            shallow.ancestors(PerimeterId::new(9)),
            Err(RightsError::CyclicHierarchy { max_depth: 3, .. })
        ));

        let deep = HierarchyFactory::chain(10, &HierarchyConfig::default());
        assert_eq!(deep.ancestors(PerimeterId::new(9)).unwrap().len(), 9);
    }

    #[test]
    fn test_disabled_cache_config() {
        let engine = RightsEngine::with_catalog(
            Config::default(),
            perimeter_rights::RightCatalog::builtin().unwrap(),
        );
        assert!(engine.cache().is_none());
        assert!(!CacheConfig::default().enabled);
    }
}
