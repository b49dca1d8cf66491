use serde::{Deserialize, Serialize};

/// Reconnection backoff policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// When false a dropped or failed connection is final.
    pub enabled: bool,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Consecutive failed attempts before giving up (valid range: 1-100).
    pub max_attempts: u32,
    /// Fraction of each delay that is randomised away (valid range: 0.0-1.0).
    pub jitter: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            max_attempts: 6,
            jitter: 0.3,
        }
    }
}
