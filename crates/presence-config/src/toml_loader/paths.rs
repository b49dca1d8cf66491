//! Where the presence config lives, and seeding it on first run.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use presence_common::ConfigError;
use tracing::{debug, info};

use super::template::default_config_toml;

/// Environment variable naming a config file to use instead of the
/// platform default.
pub const CONFIG_ENV: &str = "PRESENCE_CONFIG";

/// `$PRESENCE_CONFIG` if set, else `{config_dir}/presence/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_ENV), dirs::config_dir())
}

pub(crate) fn resolve_config_path(
    override_path: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    config_dir
        .map(|dir| dir.join("presence").join("config.toml"))
        .ok_or_else(|| {
            ConfigError::ParseError(format!(
                "could not determine config directory; set {CONFIG_ENV}"
            ))
        })
}

/// Seed `path` with the documented default config.
///
/// Returns `Ok(false)` and leaves the file alone if it already exists, so
/// two clients starting at once never clobber each other's file.
pub fn create_default_config(path: &Path) -> Result<bool, ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_error("create config directory", parent, e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("config appeared at {} before it could be seeded", path.display());
            return Ok(false);
        }
        Err(e) => return Err(io_error("create default config", path, e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_error("write default config", path, e))?;

    info!("created default config at {}", path.display());
    Ok(true)
}

fn io_error(action: &str, path: &Path, e: io::Error) -> ConfigError {
    ConfigError::ParseError(format!("failed to {action} {}: {e}", path.display()))
}
