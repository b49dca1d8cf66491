//! Core TOML config loading: read from path or platform default.

use crate::schema::PresenceConfig;
use crate::validation;
use presence_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. A config that parses but fails
/// validation is still returned; the problems are logged as a warning.
pub fn load_from_path(path: &Path) -> Result<PresenceConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: PresenceConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e} (using parsed values as-is)");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/presence/config.toml`
///
/// If the file does not exist, writes a documented default and returns defaults.
pub fn load_default() -> Result<PresenceConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            if create_default_config(&path)? {
                Ok(PresenceConfig::default())
            } else {
                load_from_path(&path)
            }
        }
        Err(e) => Err(e),
    }
}
