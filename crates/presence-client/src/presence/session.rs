//! Handle for one page view's presence connection.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::identity::CurrentUser;
use crate::roster::PresenceRoster;
use crate::transport::{connection_loop, ConnectionParams, SessionLink};

use super::types::{ConnectionStatus, SessionEvent, SessionOptions};

/// Capacity of the bounded event channel.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long `close` waits for the connection task to say goodbye.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One presence session: a single (page, user) membership.
///
/// The connection runs in a background task that owns the roster; this
/// handle only reads it. Closing (or dropping) the handle cancels the task,
/// which sends `leave` if the socket is still open. Once `close` returns,
/// the roster never changes again.
pub struct PresenceSession {
    page_id: String,
    subscription: u64,
    user: CurrentUser,
    roster_rx: watch::Receiver<PresenceRoster>,
    status_rx: watch::Receiver<ConnectionStatus>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PresenceSession {
    /// Start a session for `page_id`. Must be called inside a tokio runtime.
    ///
    /// An incomplete `user` never connects: the session stays `Idle` with
    /// an empty roster. Events from a standalone session carry subscription 0.
    pub fn connect(
        page_id: &str,
        user: CurrentUser,
        options: SessionOptions,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (Self::start(page_id, user, options, 0, event_tx), event_rx)
    }

    pub(crate) fn start(
        page_id: &str,
        user: CurrentUser,
        options: SessionOptions,
        subscription: u64,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        let (roster_tx, roster_rx) = watch::channel(PresenceRoster::default());
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Idle);
        let cancel = CancellationToken::new();

        let task = if user.is_complete() {
            let link = SessionLink {
                page_id: page_id.to_string(),
                subscription,
                roster_tx,
                status_tx,
                event_tx,
                cancel: cancel.clone(),
            };
            let params = ConnectionParams {
                page_id: page_id.to_string(),
                url: options.endpoint.url_for(page_id),
                user: user.clone(),
                options,
            };
            Some(tokio::spawn(connection_loop(params, link)))
        } else {
            debug!(page = %page_id, "Identity incomplete, presence stays idle");
            None
        };

        Self {
            page_id: page_id.to_string(),
            subscription,
            user,
            roster_rx,
            status_rx,
            cancel,
            task,
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    /// Stamp carried by every [`SessionEvent`] this session emits.
    pub fn subscription(&self) -> u64 {
        self.subscription
    }

    /// Snapshot of the current roster.
    pub fn roster(&self) -> PresenceRoster {
        self.roster_rx.borrow().clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Live view of the roster for consumers that want change notification.
    pub fn watch_roster(&self) -> watch::Receiver<PresenceRoster> {
        self.roster_rx.clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// Tear the session down: send `leave` if the socket is open, close it,
    /// and wait for the background task to finish.
    pub async fn close(&mut self) {
        self.cancel.cancel();
        if let Some(mut task) = self.task.take() {
            if tokio::time::timeout(CLOSE_TIMEOUT, &mut task).await.is_err() {
                warn!(page = %self.page_id, "Presence session did not stop in time, aborting");
                task.abort();
            }
        }
    }
}

impl Drop for PresenceSession {
    fn drop(&mut self) {
        // The task notices on its own and still says goodbye.
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for PresenceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceSession")
            .field("page_id", &self.page_id)
            .field("user", &self.user)
            .field("status", &self.status())
            .finish()
    }
}
