//! Inbound frame handling: decode, reconcile, notify.

use presence_config::JoinPolicy;
use tracing::{debug, warn};

use super::link::SessionLink;
use crate::presence::PresenceEvent;
use crate::protocol::decode_server_frame;
use crate::roster::RosterChange;

/// Fold one text frame into the session's roster.
///
/// Malformed frames are logged and reported as [`PresenceEvent::Error`];
/// the roster is left exactly as it was.
pub(crate) fn handle_frame(text: &str, policy: JoinPolicy, link: &SessionLink, page: &str) {
    let message = match decode_server_frame(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(page = %page, error = %e, "Discarding malformed presence frame");
            link.emit(PresenceEvent::Error(e.to_string()));
            return;
        }
    };

    // A superseded session must not touch the roster any more.
    if link.cancel.is_cancelled() {
        return;
    }

    let mut change = RosterChange::Unchanged;
    link.roster_tx.send_if_modified(|roster| {
        change = roster.apply(message, policy);
        change.is_change()
    });

    match change {
        RosterChange::Unchanged => {
            debug!(page = %page, "Ignoring unrecognized presence message");
            return;
        }
        RosterChange::Joined(user) | RosterChange::Rejoined(user) => {
            debug!(page = %page, user = %user.user_id, "User joined");
            link.emit(PresenceEvent::UserJoined(user));
        }
        RosterChange::Left { user_id, removed } => {
            debug!(page = %page, user = %user_id, removed, "User left");
            link.emit(PresenceEvent::UserLeft { user_id });
        }
        RosterChange::CountSet { count } => {
            debug!(page = %page, count, "Participant count received");
        }
        RosterChange::Replaced => {
            debug!(page = %page, "Presence snapshot received");
        }
    }

    let roster = link.roster_tx.borrow().clone();
    link.emit(PresenceEvent::RosterChanged(roster));
}
