//! Configuration schema types for the presence client.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod reconnect;
mod roster;
mod server;

pub use logging::*;
pub use reconnect::*;
pub use roster::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Every option has a default; only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub server: ServerConfig,
    pub reconnect: ReconnectConfig,
    pub roster: RosterConfig,
    pub logging: LoggingConfig,
}
