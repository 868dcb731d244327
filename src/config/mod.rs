//! Configuration
//!
//! Loaded once per process from a RON file. The leveling constants have no
//! defaults: a missing or invalid value stops startup.

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::progression::{ActivityRates, Level, LevelCurve, DEFAULT_BATCH};

pub use loader::{config_path, load_config, CONFIG_ENV};

fn default_cache_batch() -> Level {
    DEFAULT_BATCH
}

fn default_role_attempts() -> u32 {
    2
}

/// Process configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Exponent `k` in `level * level^k + c`
    pub experience_constant: f64,
    /// Flat per-level cost `c`
    pub level_constant: f64,
    /// Activity reward rates
    #[serde(default)]
    pub activity: ActivityRates,
    /// Levels appended per cache growth step
    #[serde(default = "default_cache_batch")]
    pub cache_batch: Level,
    /// Tries per role operation when the platform reports a transient error
    #[serde(default = "default_role_attempts")]
    pub role_attempts: u32,
}

impl Config {
    /// Config with the given constants and default everything else
    pub fn new(experience_constant: f64, level_constant: f64) -> Self {
        Self {
            experience_constant,
            level_constant,
            activity: ActivityRates::default(),
            cache_batch: default_cache_batch(),
            role_attempts: default_role_attempts(),
        }
    }

    /// Parse and validate RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Config = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.curve()?;
        self.activity.validate().map_err(ConfigError::Invalid)?;
        if self.cache_batch == 0 {
            return Err(ConfigError::Invalid("cache_batch must be at least 1".to_string()));
        }
        if self.role_attempts == 0 {
            return Err(ConfigError::Invalid("role_attempts must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Cost curve built from the leveling constants
    pub fn curve(&self) -> Result<LevelCurve, ConfigError> {
        Ok(LevelCurve::new(self.experience_constant, self.level_constant)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = Config::from_ron("(experience_constant: 1.5, level_constant: 30.0)").unwrap();
        assert_eq!(config, Config::new(1.5, 30.0));
        assert_eq!(config.curve().unwrap().cost(1).unwrap(), 31.0);
    }

    #[test]
    fn test_full_config() {
        let text = r#"(
            experience_constant: 1.2,
            level_constant: 30.0,
            activity: (
                experience_per_chat: 4.0,
                chat_limit: 8,
                experience_per_minute_voice: 2.0,
                experience_streaming_bonus: 1.0,
                booster_multiplier: 1.25,
            ),
            cache_batch: 25,
            role_attempts: 4,
        )"#;
        let config = Config::from_ron(text).unwrap();
        assert_eq!(config.activity.chat_limit, 8);
        assert_eq!(config.activity.booster_multiplier, 1.25);
        assert_eq!(config.cache_batch, 25);
        assert_eq!(config.role_attempts, 4);
    }

    #[test]
    fn test_missing_constant_is_fatal() {
        let err = Config::from_ron("(level_constant: 30.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_constant_is_fatal() {
        let err = Config::from_ron("(experience_constant: -2.0, level_constant: 30.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_batch_rejected() {
        let err = Config::from_ron("(experience_constant: 1.5, level_constant: 30.0, cache_batch: 0)")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
