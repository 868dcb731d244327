//! Level change notifications

use std::collections::VecDeque;
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::ids::MemberKey;
use crate::progression::Level;

/// Most recent announcements kept per log
pub const LEVEL_LOG_CAPACITY: usize = 6;

/// A member's derived level changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub member: MemberKey,
    pub old_level: Level,
    pub new_level: Level,
}

impl LevelChange {
    pub fn is_level_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

/// Receives level changes (public log, leaderboard refresh, ...)
pub trait LevelNotifier: Send + Sync {
    fn level_changed(&self, change: LevelChange);
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl LevelNotifier for NullNotifier {
    fn level_changed(&self, _change: LevelChange) {}
}

/// Entry in the level-up log
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: SystemTime,
    pub change: LevelChange,
}

/// Rolling public level-up log
///
/// Changes into the early levels 2..=5 are too frequent to be worth
/// announcing and are left out.
#[derive(Debug, Default)]
pub struct LevelUpLog {
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LevelUpLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a change to `level` gets announced
    pub fn announces(level: Level) -> bool {
        !(2..=5).contains(&level)
    }

    /// Record `change` if announced; returns whether it was recorded
    pub fn record(&self, change: LevelChange, at: SystemTime) -> bool {
        if !Self::announces(change.new_level) {
            return false;
        }
        let mut entries = self.entries.lock();
        entries.push_back(LogEntry { at, change });
        while entries.len() > LEVEL_LOG_CAPACITY {
            entries.pop_front();
        }
        log::info!("Member {} is now level {}", change.member, change.new_level);
        true
    }

    /// Oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }
}

impl LevelNotifier for LevelUpLog {
    fn level_changed(&self, change: LevelChange) {
        self.record(change, SystemTime::now());
    }
}
