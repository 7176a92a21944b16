//! Delegation checks over a requester's own effective rights

use super::types::{GrantCheck, GrantReason};
use crate::core::access::{Access, Role};
use crate::core::catalog::{DelegationRule, FULL_ADMIN_RIGHT, Right};
use crate::core::models::{PerimeterId, ProfileId, RightName, RightSet, Timestamp};
use crate::core::resolver::RightsResolver;
use crate::utils::error::Result;
use std::collections::HashSet;
use tracing::debug;

/// Rights conferred by each valid access of a requester
struct Authority {
    held: Vec<(PerimeterId, RightSet)>,
}

impl Authority {
    /// Union over every access, whatever its perimeter
    fn anywhere(&self) -> RightSet {
        self.held
            .iter()
            .flat_map(|(_, rights)| rights.iter().cloned())
            .collect()
    }

    /// Whether an access on `target` carries a `same` right, or an access on a
    /// strict ancestor of `target` carries an `inferior` right
    fn covers(
        &self,
        target: PerimeterId,
        above_target: &HashSet<PerimeterId>,
        same: &[Option<&RightName>],
        inferior: &[Option<&RightName>],
    ) -> bool {
        let holds = |rights: &RightSet, wanted: &[Option<&RightName>]| {
            wanted.iter().flatten().any(|name| rights.contains(*name))
        };
        self.held.iter().any(|(perimeter, rights)| {
            (*perimeter == target && holds(rights, same))
                || (above_target.contains(perimeter) && holds(rights, inferior))
        })
    }
}

/// Decides whether a requester may grant, edit, read or manage accesses and roles
#[derive(Clone, Copy)]
pub struct DelegationValidator<'a> {
    resolver: RightsResolver<'a>,
}

impl<'a> DelegationValidator<'a> {
    pub fn new(resolver: RightsResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Whether `requester` may grant `role` on `target`; denial is `Ok(false)`
    pub fn can_grant(
        &self,
        requester: ProfileId,
        role: &Role,
        target: PerimeterId,
        at: Timestamp,
    ) -> Result<bool> {
        Ok(self.explain_grant(requester, role, target, at)?.granted)
    }

    /// `can_grant` with the rights that could not be delegated
    pub fn explain_grant(
        &self,
        requester: ProfileId,
        role: &Role,
        target: PerimeterId,
        at: Timestamp,
    ) -> Result<GrantCheck> {
        let catalog = self.resolver.catalog();
        role.validate(catalog)?;
        let requester_rights = self.resolver.effective_rights(requester, target, at)?;

        if requester_rights.contains(FULL_ADMIN_RIGHT) {
            debug!("Profile {} holds {}", requester, FULL_ADMIN_RIGHT);
            return Ok(GrantCheck::allowed(GrantReason::FullAdmin));
        }

        let to_grant = catalog.effective_closure(role.granted_rights())?;
        if to_grant.is_empty() {
            return Ok(GrantCheck::refused(GrantReason::EmptyRole, Vec::new()));
        }

        let authority = self.authority(requester, at)?;
        let above_target = self.above(target)?;

        let mut denied = Vec::new();
        for name in &to_grant {
            let right = catalog.get(name)?;
            let allowed = match catalog.delegation_rule_for(right) {
                None => false,
                Some(rule) if right.is_global => rule
                    .manage_global
                    .as_ref()
                    .is_some_and(|meta| requester_rights.contains(meta)),
                Some(rule) => authority.covers(
                    target,
                    &above_target,
                    &[rule.manage_same_level.as_ref()],
                    &[rule.manage_inferior_levels.as_ref()],
                ),
            };
            if !allowed {
                denied.push(name.clone());
            }
        }

        debug!(
            "Profile {} granting role {} on perimeter {}: {} of {} rights denied",
            requester,
            role.name,
            target,
            denied.len(),
            to_grant.len()
        );
        Ok(if denied.is_empty() {
            GrantCheck::allowed(GrantReason::Authorized)
        } else {
            GrantCheck::refused(GrantReason::MissingMetaRights, denied)
        })
    }

    /// Editing or closing an access needs the authority to grant it anew
    pub fn can_edit_access(
        &self,
        requester: ProfileId,
        access: &Access,
        at: Timestamp,
    ) -> Result<bool> {
        self.can_grant(requester, &access.role, access.perimeter_id, at)
    }

    /// Whether the requester holds, on any perimeter, a manage meta-right
    /// covering every right of `role`
    pub fn can_manage_role(
        &self,
        requester: ProfileId,
        role: &Role,
        at: Timestamp,
    ) -> Result<bool> {
        let catalog = self.resolver.catalog();
        role.validate(catalog)?;
        let anywhere = self.authority(requester, at)?.anywhere();
        if anywhere.contains(FULL_ADMIN_RIGHT) {
            return Ok(true);
        }

        let rights = catalog.effective_closure(role.granted_rights())?;
        if rights.is_empty() {
            return Ok(false);
        }
        for name in &rights {
            let right = catalog.get(name)?;
            let covered = catalog.delegation_rule_for(right).is_some_and(|rule| {
                manage_meta_rights(rule, right).any(|meta| anywhere.contains(meta))
            });
            if !covered {
                debug!(
                    "Profile {} cannot manage {} of role {}",
                    requester, name, role.name
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Own accesses are always readable; others need read or manage meta-rights
    /// on the access's perimeter or above
    pub fn can_read_access(
        &self,
        requester: ProfileId,
        access: &Access,
        at: Timestamp,
    ) -> Result<bool> {
        let catalog = self.resolver.catalog();
        let above_target = self.above(access.perimeter_id)?;
        if access.profile_id == requester {
            return Ok(true);
        }

        let authority = self.authority(requester, at)?;
        let anywhere = authority.anywhere();
        if anywhere.contains(FULL_ADMIN_RIGHT) {
            return Ok(true);
        }

        let rights = self.resolver.access_rights(access)?;
        for name in &rights {
            let right = catalog.get(name)?;
            let Some(rule) = catalog.delegation_rule_for(right) else {
                return Ok(false);
            };
            let readable = if right.is_global {
                rule.manage_global
                    .as_ref()
                    .is_some_and(|meta| anywhere.contains(meta))
            } else {
                authority.covers(
                    access.perimeter_id,
                    &above_target,
                    &[rule.read_same_level.as_ref(), rule.manage_same_level.as_ref()],
                    &[
                        rule.read_inferior_levels.as_ref(),
                        rule.manage_inferior_levels.as_ref(),
                    ],
                )
            };
            if !readable {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn authority(&self, requester: ProfileId, at: Timestamp) -> Result<Authority> {
        let held = self
            .resolver
            .valid_accesses(requester, at)
            .iter()
            .map(|access| Ok((access.perimeter_id, self.resolver.access_rights(access)?)))
            .collect::<Result<_>>()?;
        Ok(Authority { held })
    }

    fn above(&self, target: PerimeterId) -> Result<HashSet<PerimeterId>> {
        Ok(self
            .resolver
            .hierarchy()
            .ancestors(target)?
            .into_iter()
            .map(|perimeter| perimeter.id)
            .collect())
    }
}

/// Meta-rights that let a holder manage `right`
fn manage_meta_rights<'r>(
    rule: &'r DelegationRule,
    right: &Right,
) -> impl Iterator<Item = &'r RightName> {
    let candidates = if right.is_global {
        [rule.manage_global.as_ref(), None]
    } else {
        [
            rule.manage_same_level.as_ref(),
            rule.manage_inferior_levels.as_ref(),
        ]
    };
    candidates.into_iter().flatten()
}
