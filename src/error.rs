//! Error types
//!
//! One enum per area. Computational errors are caller bugs and surface
//! immediately; role and store errors are expected at runtime.

use std::path::PathBuf;

use thiserror::Error;

use crate::progression::Level;
use crate::ids::RoleId;

/// Precondition violations in the leveling math
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("experience total must not be negative, got {0}")]
    NegativeExperience(f64),

    #[error("experience value must be finite, got {0}")]
    NonFiniteExperience(f64),

    #[error("level must be at least 1, got {0}")]
    InvalidLevel(Level),

    #[error("level {0} is above the maximum level {max}", max = crate::progression::MAX_LEVEL)]
    LevelTooHigh(Level),

    #[error("experience total {0} is beyond the maximum level")]
    ExperienceTooHigh(f64),

    #[error("invalid level curve: {0}")]
    InvalidCurve(String),
}

/// Startup configuration failures. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("no config directory could be determined")]
    NoConfigDir,
}

impl From<LevelError> for ConfigError {
    fn from(e: LevelError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

/// Persistence collaborator failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Platform-side role operation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("role {0} does not exist")]
    UnknownRole(RoleId),

    #[error("permission denied for role {0}")]
    PermissionDenied(RoleId),

    #[error("platform error: {message}")]
    Platform { message: String, transient: bool },
}

impl RoleError {
    /// Whether retrying the same operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, RoleError::Platform { transient: true, .. })
    }
}

/// Errors from the engine service
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not read roles of member: {0}")]
    Roles(#[from] RoleError),
}
