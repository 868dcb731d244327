//! Config file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::ConfigError;

/// Environment variable overriding the config location
pub const CONFIG_ENV: &str = "REPUTE_CONFIG";

const CONFIG_FILE: &str = "config.ron";

/// Where the config lives: `$REPUTE_CONFIG`, else the platform config dir
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    use directories::ProjectDirs;
    ProjectDirs::from("com", "repute", "Repute")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// Read, parse and validate a config file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::from_ron(&text)?;
    log::info!("Config loaded from {:?}", path);
    Ok(config)
}
