//! Presence client configuration.
//!
//! TOML-based configuration with full validation. All sections use
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use presence_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    JoinPolicy, LogLevel, LoggingConfig, PresenceConfig, ReconnectConfig, RosterConfig,
    ServerConfig, CONFIG_SCHEMA_VERSION,
};
pub use toml_loader::{load_default, load_from_path};

use std::path::Path;

use presence_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<PresenceConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
///
/// Unlike [`load_from_path`], an out-of-range value is an error here.
pub fn load_config_from(path: &Path) -> Result<PresenceConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &PresenceConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
