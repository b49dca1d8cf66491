//! Local mirror of a page's server-held roster.
//!
//! Snapshots (`presence_update`) and patches (`participants`, `user_joined`,
//! `user_left`) go through the same [`PresenceRoster::apply`] so the two
//! update styles always compose.

use presence_common::ProtocolError;
use presence_config::JoinPolicy;
use serde::{Deserialize, Serialize};

use crate::protocol::{decode_server_frame, Participant, ServerMessage};

/// Who is on a page right now.
///
/// `count` is whatever the server last said, adjusted by incremental
/// events; it is not forced to equal `users.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRoster {
    pub count: u32,
    pub users: Vec<Participant>,
}

/// What a single applied message did to the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    /// Message type carried no roster effect.
    Unchanged,
    /// Head count replaced, users untouched.
    CountSet { count: u32 },
    /// Whole roster replaced by a snapshot.
    Replaced,
    /// A user not previously listed was added.
    Joined(Participant),
    /// A listed user's entry was overwritten in place.
    Rejoined(Participant),
    /// Every entry for `user_id` was dropped.
    Left { user_id: String, removed: usize },
}

impl RosterChange {
    pub fn is_change(&self) -> bool {
        !matches!(self, RosterChange::Unchanged)
    }
}

impl PresenceRoster {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u.user_id == user_id)
    }

    pub fn get(&self, user_id: &str) -> Option<&Participant> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    /// Fold one server message into the roster.
    pub fn apply(&mut self, message: ServerMessage, policy: JoinPolicy) -> RosterChange {
        match message {
            ServerMessage::Participants { count } => {
                self.count = count;
                RosterChange::CountSet { count }
            }
            ServerMessage::PresenceUpdate { count, users } => {
                self.count = count;
                self.users = users;
                RosterChange::Replaced
            }
            ServerMessage::UserJoined { user } => self.join(user, policy),
            ServerMessage::UserLeft { user_id } => {
                self.count = self.count.saturating_sub(1);
                let before = self.users.len();
                self.users.retain(|u| u.user_id != user_id);
                let removed = before - self.users.len();
                RosterChange::Left { user_id, removed }
            }
            ServerMessage::Unknown => RosterChange::Unchanged,
        }
    }

    /// Decode a raw text frame and apply it. A frame that fails to decode
    /// leaves the roster untouched.
    pub fn apply_frame(
        &mut self,
        text: &str,
        policy: JoinPolicy,
    ) -> Result<RosterChange, ProtocolError> {
        let message = decode_server_frame(text)?;
        Ok(self.apply(message, policy))
    }

    fn join(&mut self, user: Participant, policy: JoinPolicy) -> RosterChange {
        if policy == JoinPolicy::Upsert {
            if let Some(existing) = self.users.iter_mut().find(|u| u.user_id == user.user_id) {
                *existing = user.clone();
                return RosterChange::Rejoined(user);
            }
        }
        self.count = self.count.saturating_add(1);
        self.users.push(user.clone());
        RosterChange::Joined(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str, nickname: &str) -> Participant {
        Participant {
            user_id: id.into(),
            nickname: nickname.into(),
            joined_at: "2024-05-01T09:00:00.000Z".into(),
            last_activity: "2024-05-01T09:00:00.000Z".into(),
        }
    }

    fn ids(roster: &PresenceRoster) -> Vec<&str> {
        roster.users.iter().map(|u| u.user_id.as_str()).collect()
    }

    /// Roster after a two-user snapshot for u1 and u2.
    fn scenario_a() -> PresenceRoster {
        let mut roster = PresenceRoster::default();
        let frame = json!({
            "type": "presence_update",
            "count": 2,
            "users": [
                {"userId": "u1", "nickname": "Alice", "joinedAt": "t0", "lastActivity": "t0"},
                {"userId": "u2", "nickname": "Bo", "joinedAt": "t1", "lastActivity": "t1"}
            ]
        })
        .to_string();
        roster.apply_frame(&frame, JoinPolicy::Upsert).unwrap();
        roster
    }

    #[test]
    fn snapshot_sets_exact_roster() {
        let roster = scenario_a();
        assert_eq!(roster.count, 2);
        assert_eq!(ids(&roster), vec!["u1", "u2"]);
    }

    #[test]
    fn user_left_after_snapshot() {
        let mut roster = scenario_a();
        roster
            .apply_frame(r#"{"type":"user_left","userId":"u2"}"#, JoinPolicy::Upsert)
            .unwrap();
        assert_eq!(roster.count, 1);
        assert_eq!(ids(&roster), vec!["u1"]);
    }

    #[test]
    fn user_joined_after_snapshot() {
        let mut roster = scenario_a();
        let frame = json!({
            "type": "user_joined",
            "user": {"userId": "u3", "nickname": "Cho", "joinedAt": "t2", "lastActivity": "t2"}
        })
        .to_string();
        let change = roster.apply_frame(&frame, JoinPolicy::Upsert).unwrap();
        assert!(matches!(change, RosterChange::Joined(ref p) if p.nickname == "Cho"));
        assert_eq!(roster.count, 3);
        assert_eq!(ids(&roster), vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn unparsable_frame_leaves_roster_unchanged() {
        let mut roster = scenario_a();
        let before = roster.clone();
        assert!(roster.apply_frame("{{{ nope", JoinPolicy::Upsert).is_err());
        assert!(roster
            .apply_frame(r#"{"type":"presence_update","users":[]}"#, JoinPolicy::Upsert)
            .is_err());
        assert_eq!(roster, before);
    }

    #[test]
    fn count_never_goes_negative() {
        let mut roster = PresenceRoster::default();
        for _ in 0..5 {
            roster.apply(
                ServerMessage::UserLeft {
                    user_id: "ghost".into(),
                },
                JoinPolicy::Upsert,
            );
            assert_eq!(roster.count, 0);
        }

        roster.apply(ServerMessage::Participants { count: 1 }, JoinPolicy::Upsert);
        for _ in 0..3 {
            roster.apply(
                ServerMessage::UserLeft {
                    user_id: "u1".into(),
                },
                JoinPolicy::Upsert,
            );
        }
        assert_eq!(roster.count, 0);
    }

    #[test]
    fn snapshot_replaces_regardless_of_prior_state() {
        let mut roster = scenario_a();
        roster.apply(
            ServerMessage::UserJoined {
                user: user("u9", "Zed"),
            },
            JoinPolicy::Append,
        );
        roster.apply(ServerMessage::Participants { count: 40 }, JoinPolicy::Upsert);

        let users = vec![user("u5", "Eve")];
        let change = roster.apply(
            ServerMessage::PresenceUpdate {
                count: 7,
                users: users.clone(),
            },
            JoinPolicy::Upsert,
        );
        assert_eq!(change, RosterChange::Replaced);
        assert_eq!(roster, PresenceRoster { count: 7, users });
    }

    #[test]
    fn participants_only_touches_count() {
        let mut roster = scenario_a();
        let change = roster.apply(ServerMessage::Participants { count: 9 }, JoinPolicy::Upsert);
        assert_eq!(change, RosterChange::CountSet { count: 9 });
        assert_eq!(roster.count, 9);
        assert_eq!(ids(&roster), vec!["u1", "u2"]);
    }

    #[test]
    fn append_policy_duplicates_repeated_join() {
        let mut roster = PresenceRoster::default();
        for _ in 0..2 {
            roster.apply(
                ServerMessage::UserJoined {
                    user: user("u1", "Alice"),
                },
                JoinPolicy::Append,
            );
        }
        assert_eq!(roster.count, 2);
        assert_eq!(ids(&roster), vec!["u1", "u1"]);
    }

    #[test]
    fn upsert_policy_replaces_repeated_join() {
        let mut roster = PresenceRoster::default();
        roster.apply(
            ServerMessage::UserJoined {
                user: user("u1", "Alice"),
            },
            JoinPolicy::Upsert,
        );
        let change = roster.apply(
            ServerMessage::UserJoined {
                user: user("u1", "Alice (tab 2)"),
            },
            JoinPolicy::Upsert,
        );
        assert!(matches!(change, RosterChange::Rejoined(_)));
        assert_eq!(roster.count, 1);
        assert_eq!(roster.users.len(), 1);
        assert_eq!(roster.get("u1").unwrap().nickname, "Alice (tab 2)");
    }

    #[test]
    fn upsert_keeps_position_of_existing_entry() {
        let mut roster = scenario_a();
        roster.apply(
            ServerMessage::UserJoined {
                user: user("u1", "Alice again"),
            },
            JoinPolicy::Upsert,
        );
        assert_eq!(ids(&roster), vec!["u1", "u2"]);
    }

    #[test]
    fn user_left_removes_every_match() {
        let mut roster = PresenceRoster::default();
        for id in ["x", "u1", "x", "u2", "x"] {
            roster.apply(
                ServerMessage::UserJoined { user: user(id, id) },
                JoinPolicy::Append,
            );
        }
        let change = roster.apply(
            ServerMessage::UserLeft {
                user_id: "x".into(),
            },
            JoinPolicy::Append,
        );
        assert_eq!(
            change,
            RosterChange::Left {
                user_id: "x".into(),
                removed: 3
            }
        );
        assert!(!roster.contains("x"));
        assert_eq!(ids(&roster), vec!["u1", "u2"]);
        // Count drops by one per event, not per removed entry.
        assert_eq!(roster.count, 4);
    }

    #[test]
    fn unknown_message_is_ignored() {
        let mut roster = scenario_a();
        let before = roster.clone();
        let change = roster
            .apply_frame(r#"{"type":"cursor_moved","x":1}"#, JoinPolicy::Upsert)
            .unwrap();
        assert!(!change.is_change());
        assert_eq!(roster, before);
    }

    #[test]
    fn missing_users_in_snapshot_clears_list() {
        let mut roster = scenario_a();
        roster
            .apply_frame(r#"{"type":"presence_update","count":3}"#, JoinPolicy::Upsert)
            .unwrap();
        assert_eq!(roster.count, 3);
        assert!(roster.is_empty());
    }

    #[test]
    fn null_users_in_snapshot_clears_list() {
        let mut roster = scenario_a();
        let change = roster
            .apply_frame(
                r#"{"type":"presence_update","count":3,"users":null}"#,
                JoinPolicy::Upsert,
            )
            .unwrap();
        assert_eq!(change, RosterChange::Replaced);
        assert_eq!(
            roster,
            PresenceRoster {
                count: 3,
                users: vec![]
            }
        );
    }
}
