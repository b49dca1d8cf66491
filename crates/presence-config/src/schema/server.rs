//! Presence server endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where the page-scoped presence socket lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host[:port]` of the presence server.
    pub host: String,
    /// Path the page id is appended to (must start with `/`).
    pub path_prefix: String,
    /// Use `wss` instead of `ws`. Mirrors whether the hosting page was served over https.
    pub secure: bool,
    /// Handshake timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// WebSocket ping interval in seconds; 0 disables keepalive (valid range: 0-300).
    pub keepalive_interval_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8099".into(),
            path_prefix: "/ws/presence".into(),
            secure: false,
            connect_timeout_secs: 15,
            keepalive_interval_secs: 25,
        }
    }
}
