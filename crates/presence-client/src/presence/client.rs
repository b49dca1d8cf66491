//! Re-subscribable presence client for a page view.

use presence_config::PresenceConfig;
use tokio::sync::mpsc;
use tracing::info;

use crate::identity::CurrentUser;
use crate::roster::PresenceRoster;

use super::session::{PresenceSession, EVENT_CHANNEL_CAPACITY};
use super::types::{ConnectionStatus, SessionEvent, SessionOptions};

/// Owns the presence session of whatever page the user is looking at.
///
/// Subscribing with a different page or user closes the previous session
/// (sending its `leave`) before the next one starts, so the roster seen
/// through this client only ever belongs to the current subscription.
/// All sessions report on the one event channel returned by [`new`]; use
/// [`is_current`] to skip events left over from an earlier subscription.
///
/// [`new`]: PresenceClient::new
/// [`is_current`]: PresenceClient::is_current
pub struct PresenceClient {
    options: SessionOptions,
    event_tx: mpsc::Sender<SessionEvent>,
    current: Option<PresenceSession>,
    /// Stamp of the most recently started session; 0 means none yet.
    subscriptions: u64,
}

impl PresenceClient {
    pub fn new(options: SessionOptions) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let client = Self {
            options,
            event_tx,
            current: None,
            subscriptions: 0,
        };
        (client, event_rx)
    }

    pub fn from_config(config: &PresenceConfig) -> (Self, mpsc::Receiver<SessionEvent>) {
        Self::new(SessionOptions::from_config(config))
    }

    /// Point the client at `page_id` as `user`.
    ///
    /// A no-op when nothing changed; otherwise the old session is closed
    /// first and the new one starts from an empty roster.
    pub async fn subscribe(&mut self, page_id: &str, user: CurrentUser) {
        if let Some(current) = &self.current {
            if current.page_id() == page_id && current.user() == &user {
                return;
            }
        }

        if let Some(mut previous) = self.current.take() {
            info!(
                from = %previous.page_id(),
                to = %page_id,
                "Switching presence subscription"
            );
            previous.close().await;
        }

        self.subscriptions += 1;
        self.current = Some(PresenceSession::start(
            page_id,
            user,
            self.options.clone(),
            self.subscriptions,
            self.event_tx.clone(),
        ));
    }

    /// Close the active session, if any.
    pub async fn close(&mut self) {
        if let Some(mut session) = self.current.take() {
            session.close().await;
        }
    }

    pub fn session(&self) -> Option<&PresenceSession> {
        self.current.as_ref()
    }

    /// Whether `event` came from the active session. Anything else is a
    /// leftover from a page or user that has since been switched away from.
    pub fn is_current(&self, event: &SessionEvent) -> bool {
        self.current
            .as_ref()
            .is_some_and(|session| session.subscription() == event.subscription)
    }

    /// Current roster, or the zero roster when nothing is subscribed.
    pub fn roster(&self) -> PresenceRoster {
        self.current
            .as_ref()
            .map(PresenceSession::roster)
            .unwrap_or_default()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.current
            .as_ref()
            .map(PresenceSession::status)
            .unwrap_or_default()
    }
}
