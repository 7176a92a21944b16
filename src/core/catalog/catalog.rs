//! Right catalog: definitions, dependency closure and delegation lookup

use super::types::{CatalogDocument, DelegationRule, Right};
use crate::config::CatalogConfig;
use crate::core::models::{RightName, RightSet};
use crate::utils::error::{Result, RightsError};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Right granting unconditional super-authority
pub const FULL_ADMIN_RIGHT: &str = "right_full_admin";

/// Catalog shipped with the crate
pub const BUILTIN_CATALOG: &str = include_str!("../../../config/rights.yaml");

/// Immutable, validated catalog of rights
#[derive(Debug, Clone)]
pub struct RightCatalog {
    /// Right definitions by name
    rights: HashMap<RightName, Right>,
    /// Declaration order, for listing
    order: Vec<RightName>,
    /// Reverse `depends_on` edges: target -> dependents
    dependents: HashMap<RightName, Vec<RightName>>,
    /// Delegation rules by category
    rules: HashMap<String, DelegationRule>,
}

impl RightCatalog {
    /// Build and validate a catalog from its document form
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        let mut rights = HashMap::with_capacity(document.rights.len());
        let mut order = Vec::with_capacity(document.rights.len());

        for right in document.rights {
            if right.name.trim().is_empty() {
                return Err(RightsError::invalid_catalog("Right with empty name"));
            }
            if rights.contains_key(&right.name) {
                return Err(RightsError::invalid_catalog(format!(
                    "Duplicate right: {}",
                    right.name
                )));
            }
            order.push(right.name.clone());
            rights.insert(right.name.clone(), right);
        }

        let mut dependents: HashMap<RightName, Vec<RightName>> = HashMap::new();
        for name in &order {
            if let Some(target) = &rights[name].depends_on {
                if !rights.contains_key(target) {
                    return Err(RightsError::unknown_right(target.clone()));
                }
                dependents
                    .entry(target.clone())
                    .or_default()
                    .push(name.clone());
            }
        }

        let mut catalog = Self {
            rights,
            order,
            dependents,
            rules: HashMap::new(),
        };
        catalog.check_dependency_cycles()?;

        for rule in document.delegation {
            catalog.check_rule(&rule)?;
            if catalog.rules.contains_key(&rule.category) {
                return Err(RightsError::invalid_catalog(format!(
                    "Duplicate delegation rule for category {}",
                    rule.category
                )));
            }
            catalog.rules.insert(rule.category.clone(), rule);
        }

        if !catalog.contains(FULL_ADMIN_RIGHT) {
            warn!(
                "Catalog has no {} right; no requester can bypass delegation checks",
                FULL_ADMIN_RIGHT
            );
        }

        debug!(
            "Catalog validated: {} rights, {} delegation rules",
            catalog.rights.len(),
            catalog.rules.len()
        );
        Ok(catalog)
    }

    /// Parse a YAML catalog document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let document: CatalogDocument = serde_yaml::from_str(content)?;
        Self::from_document(document)
    }

    /// Parse a JSON catalog document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(content)?;
        Self::from_document(document)
    }

    /// The catalog embedded in the crate
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Load a catalog file; `.json` files are parsed as JSON, anything else as YAML
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading rights catalog from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let catalog = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        info!("Rights catalog loaded with {} rights", catalog.len());
        Ok(catalog)
    }

    /// Load the catalog selected by configuration
    pub async fn load(config: &CatalogConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::from_path(path).await,
            None => {
                info!("Using built-in rights catalog");
                Self::builtin()
            }
        }
    }

    /// Look up a right definition
    pub fn get(&self, name: &str) -> Result<&Right> {
        self.rights
            .get(name)
            .ok_or_else(|| RightsError::unknown_right(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rights.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rights.is_empty()
    }

    /// Rights in declaration order
    pub fn rights(&self) -> impl Iterator<Item = &Right> {
        self.order.iter().map(move |name| &self.rights[name])
    }

    /// Delegation rule governing a right, if its category has one
    pub fn delegation_rule_for(&self, right: &Right) -> Option<&DelegationRule> {
        self.rules.get(&right.category)
    }

    /// Delegation rules, sorted by category
    pub fn delegation_rules(&self) -> Vec<&DelegationRule> {
        let mut rules: Vec<_> = self.rules.values().collect();
        rules.sort_by(|a, b| a.category.cmp(&b.category));
        rules
    }

    /// Closure of `held` plus every dependent right whose target is held, to fixpoint
    pub fn resolve_dependencies<I, S>(&self, held: I) -> Result<RightSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = RightSet::new();
        let mut pending = Vec::new();

        for name in held {
            let right = self.get(name.as_ref())?;
            if resolved.insert(right.name.clone()) {
                pending.push(right.name.clone());
            }
        }

        while let Some(name) = pending.pop() {
            if let Some(dependents) = self.dependents.get(&name) {
                for dependent in dependents {
                    if resolved.insert(dependent.clone()) {
                        pending.push(dependent.clone());
                    }
                }
            }
        }

        Ok(resolved)
    }

    /// Drop every right whose `depends_on` target is absent, to fixpoint
    pub fn prune_unsatisfied(&self, mut rights: RightSet) -> RightSet {
        loop {
            let orphans: Vec<RightName> = rights
                .iter()
                .filter(|name| {
                    self.rights
                        .get(name.as_str())
                        .and_then(|right| right.depends_on.as_ref())
                        .is_some_and(|target| !rights.contains(target))
                })
                .cloned()
                .collect();

            if orphans.is_empty() {
                return rights;
            }
            for orphan in orphans {
                debug!("Dropping {} whose dependency is not held", orphan);
                rights.remove(&orphan);
            }
        }
    }

    /// Rights effectively held given a raw set of granted rights
    pub fn effective_closure<I, S>(&self, held: I) -> Result<RightSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolved = self.resolve_dependencies(held)?;
        Ok(self.prune_unsatisfied(resolved))
    }

    fn check_dependency_cycles(&self) -> Result<()> {
        for name in &self.order {
            let mut seen = HashSet::new();
            let mut current = name;
            while let Some(target) = &self.rights[current].depends_on {
                if !seen.insert(current) || target == name {
                    return Err(RightsError::invalid_catalog(format!(
                        "Dependency cycle through right {}",
                        name
                    )));
                }
                current = target;
            }
        }
        Ok(())
    }

    fn check_rule(&self, rule: &DelegationRule) -> Result<()> {
        if !self.rights.values().any(|r| r.category == rule.category) {
            return Err(RightsError::invalid_catalog(format!(
                "Delegation rule for unknown category {}",
                rule.category
            )));
        }
        for name in rule.referenced_rights() {
            self.get(name)?;
        }

        let flagged = |slot: &Option<RightName>, flag: fn(&Right) -> bool, what: &str| {
            match slot {
                Some(name) if !flag(&self.rights[name]) => Err(RightsError::invalid_catalog(
                    format!(
                        "Right {} used as {} meta-right for {} lacks the matching flag",
                        name, what, rule.category
                    ),
                )),
                _ => Ok(()),
            }
        };
        flagged(
            &rule.manage_same_level,
            |r| r.allow_edit_accesses_on_same_level,
            "manage_same_level",
        )?;
        flagged(
            &rule.manage_inferior_levels,
            |r| r.allow_edit_accesses_on_inf_levels,
            "manage_inferior_levels",
        )?;
        flagged(
            &rule.read_same_level,
            |r| r.allow_read_accesses_on_same_level,
            "read_same_level",
        )?;
        flagged(
            &rule.read_inferior_levels,
            |r| r.allow_read_accesses_on_inf_levels,
            "read_inferior_levels",
        )?;

        if let Some(name) = &rule.manage_global {
            if !self.rights[name].is_global {
                return Err(RightsError::invalid_catalog(format!(
                    "Right {} used as manage_global meta-right for {} is not global",
                    name, rule.category
                )));
            }
        }

        Ok(())
    }
}
