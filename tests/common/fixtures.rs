//! Test fixtures and data factories
//!
//! All factories create real objects, not mocks.

use chrono::{Duration, TimeZone, Utc};
use perimeter_rights::config::HierarchyConfig;
use perimeter_rights::core::access::{AccessGrant, InMemoryAccessStore, Profile, Role};
use perimeter_rights::core::models::{AccessId, PerimeterId, ProfileId, RoleId, Timestamp};
use perimeter_rights::core::perimeter::{Perimeter, PerimeterHierarchy};

/// Reference evaluation instant
pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Factory for perimeter hierarchies
pub struct HierarchyFactory;

impl HierarchyFactory {
    /// Perimeter ids of `hospital()`, sorted
    pub const HOSPITAL_IDS: [i64; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

    /// ```text
    /// 1 APHP
    /// ├── 2 Hospital A
    /// │   ├── 4 Cardiology ── 6 Cardiology ward
    /// │   └── 5 Neurology
    /// └── 3 Hospital B ── 7 Pediatrics ── 8 Neonatology
    /// ```
    pub fn hospital() -> PerimeterHierarchy {
        let root = Perimeter::root(1, "APHP");
        let a = Perimeter::child(2, "Hospital A", &root);
        let b = Perimeter::child(3, "Hospital B", &root);
        let cardio = Perimeter::child(4, "Cardiology", &a);
        let neuro = Perimeter::child(5, "Neurology", &a);
        let ward = Perimeter::child(6, "Cardiology ward", &cardio);
        let pedia = Perimeter::child(7, "Pediatrics", &b);
        let neonat = Perimeter::child(8, "Neonatology", &pedia);
        PerimeterHierarchy::new(
            [root, a, b, cardio, neuro, ward, pedia, neonat],
            &HierarchyConfig::default(),
        )
        .unwrap()
    }

    /// Linear chain `0 <- 1 <- ... <- len - 1`
    pub fn chain(len: i64, config: &HierarchyConfig) -> PerimeterHierarchy {
        let mut perimeters = vec![Perimeter::root(0, "p0")];
        for id in 1..len {
            let parent = perimeters[(id - 1) as usize].clone();
            perimeters.push(Perimeter::child(id, format!("p{}", id), &parent));
        }
        PerimeterHierarchy::new(perimeters, config).unwrap()
    }

    /// P1.parent = P2, P2.parent = P1
    pub fn cyclic() -> PerimeterHierarchy {
        let mut p1 = Perimeter::root(1, "P1");
        let mut p2 = Perimeter::root(2, "P2");
        p1.parent_id = Some(PerimeterId::new(2));
        p2.parent_id = Some(PerimeterId::new(1));
        PerimeterHierarchy::new([p1, p2], &HierarchyConfig::default()).unwrap()
    }
}

/// Builder for populated in-memory stores
#[derive(Default)]
pub struct StoreBuilder {
    store: InMemoryAccessStore,
    next_access: i64,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, id: i64, name: &str, rights: &[&str]) -> Self {
        self.store.add_role(Role::granting(id, name, rights)).unwrap();
        self
    }

    pub fn profile(mut self, id: i64, user_id: &str) -> Self {
        self.store.add_profile(Profile::new(id, user_id)).unwrap();
        self
    }

    /// Open-ended access that started thirty days before `t0()`
    pub fn access(self, profile: i64, role: i64, perimeter: i64) -> Self {
        self.grant(profile, role, perimeter, None)
    }

    pub fn access_until(self, profile: i64, role: i64, perimeter: i64, end: Timestamp) -> Self {
        self.grant(profile, role, perimeter, Some(end))
    }

    pub fn build(self) -> InMemoryAccessStore {
        self.store
    }

    fn grant(mut self, profile: i64, role: i64, perimeter: i64, end: Option<Timestamp>) -> Self {
        self.next_access += 1;
        self.store
            .grant(AccessGrant {
                id: AccessId::new(self.next_access),
                profile_id: ProfileId::new(profile),
                role_id: RoleId::new(role),
                perimeter_id: PerimeterId::new(perimeter),
                start_datetime: t0() - Duration::days(30),
                end_datetime: end,
                delete_datetime: None,
            })
            .unwrap();
        self
    }
}
