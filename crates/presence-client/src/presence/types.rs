//! Options, status, and event types for presence sessions.

use std::time::Duration;

use presence_common::SessionId;
use presence_config::{JoinPolicy, PresenceConfig, ReconnectConfig};

use crate::endpoint::Endpoint;
use crate::protocol::Participant;
use crate::roster::PresenceRoster;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Everything a session needs besides the page id and the user.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub endpoint: Endpoint,
    pub connect_timeout: Duration,
    /// Ping interval; `None` disables keepalive.
    pub keepalive_interval: Option<Duration>,
    pub reconnect: ReconnectConfig,
    pub join_policy: JoinPolicy,
}

impl SessionOptions {
    pub fn from_config(config: &PresenceConfig) -> Self {
        let keepalive = config.server.keepalive_interval_secs;
        Self {
            endpoint: Endpoint::from_config(&config.server),
            connect_timeout: Duration::from_secs(config.server.connect_timeout_secs.into()),
            keepalive_interval: (keepalive > 0).then(|| Duration::from_secs(keepalive.into())),
            reconnect: config.reconnect.clone(),
            join_policy: config.roster.join_policy,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&PresenceConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Where a session is in its connection lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No connection attempted (incomplete identity, or not yet subscribed).
    #[default]
    Idle,
    Connecting,
    Open,
    /// Waiting out a backoff delay before retry number `attempt`.
    Reconnecting { attempt: u32 },
    /// Connection gone and no retry will follow.
    Closed,
    /// Retries exhausted after `attempts` consecutive failures.
    GaveUp { attempts: u32 },
}

impl ConnectionStatus {
    pub fn is_open(self) -> bool {
        matches!(self, ConnectionStatus::Open)
    }

    /// No further transitions will happen.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ConnectionStatus::Closed | ConnectionStatus::GaveUp { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events emitted by a presence session for the UI to consume.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenceEvent {
    Status(ConnectionStatus),
    /// Socket open and `join` sent.
    Connected { session_id: SessionId },
    /// Socket lost without being asked to close.
    Disconnected,
    /// Roster after any message that changed it.
    RosterChanged(PresenceRoster),
    UserJoined(Participant),
    UserLeft { user_id: String },
    Error(String),
    GaveUp { attempts: u32 },
}

/// A [`PresenceEvent`] stamped with the subscription that produced it.
///
/// A [`PresenceClient`](super::PresenceClient) reuses one channel across
/// page switches, so events queued by a torn-down session can still be
/// waiting when the next one starts. `subscription` tells them apart even
/// when the same page is subscribed again as a different user.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub page_id: String,
    pub subscription: u64,
    pub event: PresenceEvent,
}
