//! Repute - experience, levels and level roles for community bots
//!
//! Turns chat and voice activity into experience, derives levels from a
//! cached cumulative cost curve, and keeps members' level roles in sync.

pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod progression;
pub mod roles;
pub mod save;

// Re-export commonly used types
pub use config::Config;
pub use engine::{LevelEngine, MemberPresence};
pub use error::{ConfigError, EngineError, LevelError, RoleError, StoreError};
pub use ids::{GuildId, MemberKey, RoleId, UserId};
pub use progression::{ExperienceLedger, Level, LevelCache, LevelCurve, LevelResolver};
pub use roles::{LevelRoleMap, RoleGateway, reconcile};
pub use save::{ExperienceStore, MemberRecord, MemoryStore};
