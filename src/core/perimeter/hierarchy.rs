//! Read-only snapshot of the perimeter forest

use super::types::Perimeter;
use crate::config::HierarchyConfig;
use crate::core::models::{PerimeterId, next_revision};
use crate::utils::error::{Result, RightsError};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Perimeter forest with parent and child indexes
#[derive(Debug, Clone)]
pub struct PerimeterHierarchy {
    /// Perimeters by id
    pub(super) perimeters: HashMap<PerimeterId, Perimeter>,
    /// Child ids by parent id, sorted
    children: HashMap<PerimeterId, Vec<PerimeterId>>,
    /// Parent hops allowed before a traversal is reported as cyclic
    max_depth: usize,
    /// Snapshot version supplied by the perimeter store
    version: u64,
    /// Identity of this build, distinct for every hierarchy in the process
    revision: u64,
}

impl PerimeterHierarchy {
    /// Build a snapshot; every referenced parent must be part of it
    pub fn new<I>(perimeters: I, config: &HierarchyConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Perimeter>,
    {
        let mut by_id: HashMap<PerimeterId, Perimeter> = HashMap::new();
        for perimeter in perimeters {
            if by_id.contains_key(&perimeter.id) {
                return Err(RightsError::conflict(format!(
                    "Duplicate perimeter id {}",
                    perimeter.id
                )));
            }
            by_id.insert(perimeter.id, perimeter);
        }

        let mut children: HashMap<PerimeterId, Vec<PerimeterId>> = HashMap::new();
        for perimeter in by_id.values() {
            if let Some(parent_id) = perimeter.parent_id {
                let parent = by_id
                    .get(&parent_id)
                    .ok_or(RightsError::UnknownPerimeter(parent_id))?;
                if config.warn_on_level_mismatch && perimeter.level != parent.level + 1 {
                    warn!(
                        "Perimeter {} has level {} but its parent {} has level {}",
                        perimeter.id, perimeter.level, parent.id, parent.level
                    );
                }
                children.entry(parent_id).or_default().push(perimeter.id);
            }
        }
        for ids in children.values_mut() {
            ids.sort();
        }

        debug!("Perimeter hierarchy built with {} perimeters", by_id.len());
        Ok(Self {
            perimeters: by_id,
            children,
            max_depth: config.max_depth,
            version: 0,
            revision: next_revision(),
        })
    }

    /// Tag the snapshot with the store's version
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Memoization identity; two hierarchies never share one
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.perimeters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perimeters.is_empty()
    }

    pub fn get(&self, id: PerimeterId) -> Result<&Perimeter> {
        self.perimeters
            .get(&id)
            .ok_or(RightsError::UnknownPerimeter(id))
    }

    pub fn contains(&self, id: PerimeterId) -> bool {
        self.perimeters.contains_key(&id)
    }

    /// All perimeters, sorted by id
    pub fn perimeters(&self) -> Vec<&Perimeter> {
        let mut all: Vec<_> = self.perimeters.values().collect();
        all.sort_by_key(|p| p.id);
        all
    }

    /// Perimeters without parent, sorted by id
    pub fn roots(&self) -> Vec<&Perimeter> {
        self.perimeters().into_iter().filter(|p| p.is_root()).collect()
    }

    /// Direct children of a perimeter, sorted by id
    pub fn children(&self, id: PerimeterId) -> Result<Vec<&Perimeter>> {
        self.get(id)?;
        Ok(self
            .children
            .get(&id)
            .map(|ids| ids.iter().map(|child| &self.perimeters[child]).collect())
            .unwrap_or_default())
    }

    /// Strict ancestors, nearest first, ending at the root
    pub fn ancestors(&self, id: PerimeterId) -> Result<Vec<&Perimeter>> {
        let mut chain = self.ancestors_inclusive(id)?;
        chain.remove(0);
        Ok(chain)
    }

    /// The perimeter itself followed by its ancestors, nearest first
    pub fn ancestors_inclusive(&self, id: PerimeterId) -> Result<Vec<&Perimeter>> {
        let mut current = self.get(id)?;
        let mut chain = vec![current];
        let mut visited = HashSet::from([id]);

        while let Some(parent_id) = current.parent_id {
            if chain.len() > self.max_depth || !visited.insert(parent_id) {
                return Err(self.cyclic(id));
            }
            current = self.get(parent_id)?;
            chain.push(current);
        }

        Ok(chain)
    }

    /// Strict descendants, breadth first
    pub fn descendants(&self, id: PerimeterId) -> Result<BTreeSet<PerimeterId>> {
        self.get(id)?;

        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([(id, 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            let Some(children) = self.children.get(&current) else {
                continue;
            };
            if depth >= self.max_depth {
                return Err(self.cyclic(id));
            }
            for child in children {
                if *child == id || !found.insert(*child) {
                    return Err(self.cyclic(id));
                }
                queue.push_back((*child, depth + 1));
            }
        }

        Ok(found)
    }

    /// Whether `candidate` sits strictly below `of`
    pub fn is_strict_descendant(&self, candidate: PerimeterId, of: PerimeterId) -> Result<bool> {
        self.get(of)?;
        Ok(self.ancestors(candidate)?.iter().any(|p| p.id == of))
    }

    /// Walk every perimeter to the root; rejects snapshots containing a cycle
    pub fn check_acyclic(&self) -> Result<()> {
        for id in self.perimeters.keys() {
            self.ancestors_inclusive(*id)?;
        }
        Ok(())
    }

    fn cyclic(&self, id: PerimeterId) -> RightsError {
        warn!("Traversal from perimeter {} did not reach a root", id);
        RightsError::CyclicHierarchy {
            perimeter: id,
            max_depth: self.max_depth,
        }
    }
}
