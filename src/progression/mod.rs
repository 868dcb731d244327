//! Progression systems
//!
//! Cost curve, threshold cache, level resolution, the experience ledger and
//! activity rewards.

pub mod curve;
pub mod cache;
pub mod resolver;
pub mod ledger;
pub mod xp;

/// Member level, always >= 1 once resolved
pub type Level = u32;

pub use curve::LevelCurve;
pub use cache::{LevelCache, MAX_LEVEL};
pub use resolver::{LevelResolver, LevelProgress, DEFAULT_BATCH};
pub use ledger::{ceil2, round2, ExperienceLedger, LedgerOutcome, Standing};
pub use xp::{ActivityRates, ChatWindow, VoicePresence, CHAT_WINDOW};
