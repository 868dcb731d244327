//! Level role reconciliation
//!
//! Pure planning: which roles to grant and revoke so a member's roles match
//! their level. Applying the plan lives in [`super::apply`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::RoleId;
use crate::progression::Level;

/// Sparse level -> role mapping for a guild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelRoleMap(BTreeMap<Level, RoleId>);

impl LevelRoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `level` to `role`, returning the role previously mapped there
    pub fn set(&mut self, level: Level, role: RoleId) -> Option<RoleId> {
        self.0.insert(level, role)
    }

    pub fn remove(&mut self, level: Level) -> Option<RoleId> {
        self.0.remove(&level)
    }

    pub fn get(&self, level: Level) -> Option<RoleId> {
        self.0.get(&level).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Level, RoleId)> + '_ {
        self.0.iter().map(|(&level, &role)| (level, role))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Level, RoleId)> for LevelRoleMap {
    fn from_iter<I: IntoIterator<Item = (Level, RoleId)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Grants and revokes needed to bring a member in line with their level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePlan {
    pub grants: BTreeSet<RoleId>,
    pub revokes: BTreeSet<RoleId>,
    /// Mappings pointing at roles the platform no longer knows
    pub skipped: Vec<(Level, RoleId)>,
}

impl RolePlan {
    /// Nothing to grant or revoke
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.revokes.is_empty()
    }

    /// Roles the member holds once the plan is fully applied
    pub fn applied_to(&self, current: &BTreeSet<RoleId>) -> BTreeSet<RoleId> {
        current
            .iter()
            .filter(|role| !self.revokes.contains(role))
            .chain(self.grants.iter())
            .copied()
            .collect()
    }
}

/// Plan against a mapping whose roles all exist
pub fn reconcile(current: &BTreeSet<RoleId>, map: &LevelRoleMap, new_level: Level) -> RolePlan {
    reconcile_with(current, map, new_level, |_| true)
}

/// Plan, skipping mapped roles for which `exists` is false
///
/// A role mapped at several levels is wanted as soon as any of them is
/// reached, so it never ends up both granted and revoked.
pub fn reconcile_with<F>(
    current: &BTreeSet<RoleId>,
    map: &LevelRoleMap,
    new_level: Level,
    exists: F,
) -> RolePlan
where
    F: Fn(RoleId) -> bool,
{
    let mut plan = RolePlan::default();
    let mut wanted = BTreeSet::new();
    let mut unwanted = BTreeSet::new();

    for (level, role) in map.iter() {
        if !exists(role) {
            log::warn!("Level {} maps to role {} which no longer exists; skipping", level, role);
            plan.skipped.push((level, role));
            continue;
        }
        if level <= new_level {
            wanted.insert(role);
        } else {
            unwanted.insert(role);
        }
    }

    for role in &wanted {
        if !current.contains(role) {
            plan.grants.insert(*role);
        }
    }
    for role in unwanted.difference(&wanted) {
        if current.contains(role) {
            plan.revokes.insert(*role);
        }
    }
    plan
}
