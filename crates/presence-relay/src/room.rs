//! Room store: one presence room per page, members keyed by connection.

use std::collections::HashMap;
use std::sync::Arc;

use presence_client::{Participant, ServerMessage};
use presence_common::SessionId;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

/// A connected socket in a room. It only counts toward the roster once it
/// has sent `join`.
struct Member {
    conn_id: String,
    tx: mpsc::Sender<String>,
    joined: Option<(Participant, SessionId)>,
}

#[derive(Default)]
struct Room {
    // Connection order, which is also roster order.
    members: Vec<Member>,
}

impl Room {
    fn member_mut(&mut self, conn_id: &str) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.conn_id == conn_id)
    }

    fn snapshot(&self) -> ServerMessage {
        let users: Vec<Participant> = self
            .members
            .iter()
            .filter_map(|m| m.joined.as_ref().map(|(p, _)| p.clone()))
            .collect();
        ServerMessage::PresenceUpdate {
            count: u32::try_from(users.len()).unwrap_or(u32::MAX),
            users,
        }
    }

    fn senders(&self, except: Option<&str>) -> Vec<mpsc::Sender<String>> {
        self.members
            .iter()
            .filter(|m| Some(m.conn_id.as_str()) != except)
            .map(|m| m.tx.clone())
            .collect()
    }

    /// `user_left` for everyone still here, then the new snapshot.
    fn departure(&self, user_id: String) -> Vec<Broadcast> {
        let mut out = Vec::new();
        if !self.members.is_empty() {
            out.push(Broadcast::new(
                self.senders(None),
                &ServerMessage::UserLeft { user_id },
            ));
            out.push(Broadcast::new(self.senders(None), &self.snapshot()));
        }
        out
    }
}

/// One frame bound for a set of connections.
pub struct Broadcast {
    pub to: Vec<mpsc::Sender<String>>,
    pub frame: String,
}

impl Broadcast {
    fn new(to: Vec<mpsc::Sender<String>>, msg: &ServerMessage) -> Self {
        // ServerMessage only holds strings and integers.
        let frame = serde_json::to_string(msg).unwrap_or_default();
        Self { to, frame }
    }

    /// Queue the frame for every recipient without waiting on any of them.
    ///
    /// A viewer whose queue is full misses this frame; the next
    /// `presence_update` resynchronizes it. Returns how many were queued.
    pub fn deliver(self) -> usize {
        let mut queued = 0;
        for tx in &self.to {
            match tx.try_send(self.frame.clone()) {
                Ok(()) => queued += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!("Member queue full, dropping frame");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Member channel closed");
                }
            }
        }
        queued
    }
}

/// Thread-safe room store.
#[derive(Clone, Default)]
pub struct RoomStore {
    rooms: Arc<RwLock<HashMap<String, Room>>>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to `page`'s room. It is not on the roster yet.
    pub async fn register(&self, page: &str, conn_id: &str, tx: mpsc::Sender<String>) {
        let mut rooms = self.rooms.write().await;
        rooms.entry(page.to_string()).or_default().members.push(Member {
            conn_id: conn_id.to_string(),
            tx,
            joined: None,
        });
    }

    /// Put the connection's participant on the roster.
    ///
    /// A repeated `join` on the same connection replaces its entry.
    pub async fn join(
        &self,
        page: &str,
        conn_id: &str,
        participant: Participant,
        session_id: SessionId,
    ) -> Vec<Broadcast> {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(page) else {
            return Vec::new();
        };
        let Some(member) = room.member_mut(conn_id) else {
            return Vec::new();
        };
        member.joined = Some((participant.clone(), session_id));

        vec![
            Broadcast::new(
                room.senders(Some(conn_id)),
                &ServerMessage::UserJoined { user: participant },
            ),
            Broadcast::new(room.senders(None), &room.snapshot()),
        ]
    }

    /// Take the connection's participant off the roster.
    ///
    /// Ignored unless `user_id` and `session_id` match what it joined with.
    pub async fn leave(
        &self,
        page: &str,
        conn_id: &str,
        user_id: &str,
        session_id: &SessionId,
    ) -> Vec<Broadcast> {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(page) else {
            return Vec::new();
        };
        let Some(member) = room.member_mut(conn_id) else {
            return Vec::new();
        };
        let matches = matches!(
            &member.joined,
            Some((p, s)) if p.user_id == user_id && s == session_id
        );
        if !matches {
            tracing::debug!(page = %page, user = %user_id, "Ignoring leave for unknown session");
            return Vec::new();
        }
        member.joined = None;
        room.departure(user_id.to_string())
    }

    /// Drop a connection. Empty rooms are removed.
    pub async fn unregister(&self, page: &str, conn_id: &str) -> Vec<Broadcast> {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(page) else {
            return Vec::new();
        };
        let Some(pos) = room.members.iter().position(|m| m.conn_id == conn_id) else {
            return Vec::new();
        };
        let member = room.members.remove(pos);

        if room.members.is_empty() {
            rooms.remove(page);
            return Vec::new();
        }
        match member.joined {
            Some((participant, _)) => room.departure(participant.user_id),
            None => Vec::new(),
        }
    }

    /// Number of pages with at least one connection.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Participants currently joined on `page`.
    #[cfg(test)]
    pub async fn roster(&self, page: &str) -> Vec<Participant> {
        let rooms = self.rooms.read().await;
        match rooms.get(page).map(Room::snapshot) {
            Some(ServerMessage::PresenceUpdate { users, .. }) => users,
            _ => Vec::new(),
        }
    }
}
