//! Channels a connection task uses to publish state back to its session.

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::presence::{ConnectionStatus, PresenceEvent, SessionEvent};
use crate::roster::PresenceRoster;

pub(crate) struct SessionLink {
    pub(crate) page_id: String,
    pub(crate) subscription: u64,
    pub(crate) roster_tx: watch::Sender<PresenceRoster>,
    pub(crate) status_tx: watch::Sender<ConnectionStatus>,
    pub(crate) event_tx: mpsc::Sender<SessionEvent>,
    pub(crate) cancel: CancellationToken,
}

impl SessionLink {
    /// Queue an event without blocking the socket loop. A consumer that
    /// stops draining loses events, never roster state.
    pub(crate) fn emit(&self, event: PresenceEvent) {
        let event = SessionEvent {
            page_id: self.page_id.clone(),
            subscription: self.subscription,
            event,
        };
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                debug!(event = ?dropped.event, "Presence event channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }

    /// Publish a status transition; repeated identical statuses are swallowed.
    pub(crate) fn set_status(&self, status: ConnectionStatus) {
        let changed = self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
        if changed {
            self.emit(PresenceEvent::Status(status));
        }
    }
}
