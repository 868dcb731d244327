//! Engine service
//!
//! Orchestrates activity, admin adjustments, role reconciliation and
//! notifications on top of the progression core.

pub mod announce;
pub mod leaderboard;
pub mod locks;
pub mod service;

pub use announce::{LevelChange, LevelNotifier, LevelUpLog, NullNotifier, LEVEL_LOG_CAPACITY};
pub use leaderboard::{LeaderboardEntry, rank_members};
pub use locks::MemberLocks;
pub use service::{
    AwardResult, LevelEngine, MemberPresence, MemberSync, MemberUpdate, RoleSync, SkipReason,
    SweepReport,
};
