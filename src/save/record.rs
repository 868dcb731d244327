//! Persisted member data

use serde::{Deserialize, Serialize};

use crate::progression::Level;

/// What is stored per (guild, user)
///
/// `level` is a cache of the last derived level. It is rewritten on every
/// ledger update and never trusted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberRecord {
    pub experience: f64,
    pub level: Level,
    pub blacklisted: bool,
}

impl Default for MemberRecord {
    fn default() -> Self {
        Self {
            experience: 0.0,
            level: 1,
            blacklisted: false,
        }
    }
}

impl MemberRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a loaded record is usable
    pub fn validate(&self) -> Result<(), String> {
        if !self.experience.is_finite() || self.experience < 0.0 {
            return Err(format!("experience must be finite and >= 0, got {}", self.experience));
        }
        if self.level == 0 {
            return Err("level must be at least 1".to_string());
        }
        Ok(())
    }
}
