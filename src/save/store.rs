//! Persistence collaborator
//!
//! The engine only sees [`ExperienceStore`]. [`MemoryStore`] keeps
//! everything in process and backs the tests and the CLI.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::record::MemberRecord;
use crate::error::StoreError;
use crate::ids::{GuildId, MemberKey, RoleId, UserId};
use crate::progression::Level;
use crate::roles::LevelRoleMap;

/// Load/store of member records and guild level roles
pub trait ExperienceStore: Send + Sync {
    /// Record for `member`, or the default record on first activity
    fn load_member(&self, member: MemberKey) -> Result<MemberRecord, StoreError>;

    fn save_member(&self, member: MemberKey, record: &MemberRecord) -> Result<(), StoreError>;

    /// Every stored member of `guild`
    fn guild_members(&self, guild: GuildId) -> Result<Vec<(UserId, MemberRecord)>, StoreError>;

    fn level_roles(&self, guild: GuildId) -> Result<LevelRoleMap, StoreError>;

    fn set_level_role(&self, guild: GuildId, level: Level, role: RoleId) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    members: RwLock<HashMap<MemberKey, MemberRecord>>,
    level_roles: RwLock<HashMap<GuildId, LevelRoleMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored member records
    pub fn member_count(&self) -> usize {
        self.members.read().len()
    }
}

impl ExperienceStore for MemoryStore {
    fn load_member(&self, member: MemberKey) -> Result<MemberRecord, StoreError> {
        Ok(self.members.read().get(&member).cloned().unwrap_or_default())
    }

    fn save_member(&self, member: MemberKey, record: &MemberRecord) -> Result<(), StoreError> {
        record.validate().map_err(StoreError::Corrupt)?;
        self.members.write().insert(member, record.clone());
        Ok(())
    }

    fn guild_members(&self, guild: GuildId) -> Result<Vec<(UserId, MemberRecord)>, StoreError> {
        let mut members: Vec<_> = self
            .members
            .read()
            .iter()
            .filter(|(key, _)| key.guild == guild)
            .map(|(key, record)| (key.user, record.clone()))
            .collect();
        members.sort_by_key(|(user, _)| *user);
        Ok(members)
    }

    fn level_roles(&self, guild: GuildId) -> Result<LevelRoleMap, StoreError> {
        Ok(self.level_roles.read().get(&guild).cloned().unwrap_or_default())
    }

    fn set_level_role(&self, guild: GuildId, level: Level, role: RoleId) -> Result<(), StoreError> {
        self.level_roles.write().entry(guild).or_default().set(level, role);
        Ok(())
    }
}
