//! Wire protocol for the page presence channel.
//!
//! Every frame is a JSON object tagged by `type`. The client sends `join`
//! once per connection and `leave` on intentional teardown; the server
//! pushes roster snapshots and incremental patches. Unknown server message
//! types decode to [`ServerMessage::Unknown`] so newer servers don't break
//! older clients.

use presence_common::{ProtocolError, SessionId};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Shared types
// ---------------------------------------------------------------------------

/// A user visible in a page's presence roster.
///
/// Timestamps are carried verbatim from the server; they are advisory and
/// never recomputed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: String,
    pub nickname: String,
    #[serde(default)]
    pub joined_at: String,
    #[serde(default)]
    pub last_activity: String,
}

// ---------------------------------------------------------------------------
// Client -> server
// ---------------------------------------------------------------------------

/// The `user` object carried by a `join` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinUser {
    pub user_id: String,
    pub nickname: String,
    pub joined_at: String,
    pub last_activity: String,
    pub session_id: SessionId,
}

impl JoinUser {
    pub fn into_participant(self) -> Participant {
        Participant {
            user_id: self.user_id,
            nickname: self.nickname,
            joined_at: self.joined_at,
            last_activity: self.last_activity,
        }
    }
}

/// Messages the client sends to the presence server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        user: JoinUser,
    },
    Leave {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "sessionId")]
        session_id: SessionId,
    },
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Server -> client
// ---------------------------------------------------------------------------

/// Messages the presence server pushes to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Head count only.
    Participants { count: u32 },
    /// Full roster snapshot.
    PresenceUpdate {
        count: u32,
        #[serde(default, deserialize_with = "null_as_empty")]
        users: Vec<Participant>,
    },
    UserJoined { user: Participant },
    UserLeft {
        #[serde(rename = "userId")]
        user_id: String,
    },
    #[serde(other)]
    Unknown,
}

/// An explicit `null` list reads the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decode one inbound text frame.
pub fn decode_server_frame(text: &str) -> Result<ServerMessage, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode one outbound text frame (server side of the contract).
pub fn decode_client_frame(text: &str) -> Result<ClientMessage, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alice() -> Participant {
        Participant {
            user_id: "u1".into(),
            nickname: "Alice".into(),
            joined_at: "2024-05-01T09:00:00.000Z".into(),
            last_activity: "2024-05-01T09:05:00.000Z".into(),
        }
    }

    #[test]
    fn participant_uses_camel_case_fields() {
        let value = serde_json::to_value(alice()).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["joinedAt"], "2024-05-01T09:00:00.000Z");
        assert_eq!(value["lastActivity"], "2024-05-01T09:05:00.000Z");
    }

    #[test]
    fn participant_timestamps_are_optional() {
        let p: Participant =
            serde_json::from_value(json!({"userId": "u2", "nickname": "Bo"})).unwrap();
        assert_eq!(p.user_id, "u2");
        assert!(p.joined_at.is_empty());
    }

    #[test]
    fn join_wire_shape() {
        let msg = ClientMessage::Join {
            user: JoinUser {
                user_id: "u1".into(),
                nickname: "Alice".into(),
                joined_at: "t0".into(),
                last_activity: "t0".into(),
                session_id: SessionId::for_user("u1", 1000),
            },
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "join",
                "user": {
                    "userId": "u1",
                    "nickname": "Alice",
                    "joinedAt": "t0",
                    "lastActivity": "t0",
                    "sessionId": "u1-1000"
                }
            })
        );
    }

    #[test]
    fn leave_always_carries_session_id() {
        let msg = ClientMessage::Leave {
            user_id: "u1".into(),
            session_id: SessionId::for_user("u1", 7),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"type": "leave", "userId": "u1", "sessionId": "u1-7"})
        );
    }

    #[test]
    fn decodes_participants() {
        let msg = decode_server_frame(r#"{"type":"participants","count":4}"#).unwrap();
        assert_eq!(msg, ServerMessage::Participants { count: 4 });
    }

    #[test]
    fn decodes_presence_update_without_users() {
        let msg = decode_server_frame(r#"{"type":"presence_update","count":0}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::PresenceUpdate {
                count: 0,
                users: Vec::new()
            }
        );
    }

    #[test]
    fn decodes_presence_update_with_null_users() {
        let msg =
            decode_server_frame(r#"{"type":"presence_update","count":3,"users":null}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::PresenceUpdate {
                count: 3,
                users: Vec::new()
            }
        );
    }

    #[test]
    fn decodes_user_joined_and_ignores_extra_fields() {
        let frame = json!({
            "type": "user_joined",
            "user": {
                "userId": "u3",
                "nickname": "Cho",
                "joinedAt": "a",
                "lastActivity": "b",
                "sessionId": "u3-99"
            }
        })
        .to_string();
        let msg = decode_server_frame(&frame).unwrap();
        assert!(matches!(msg, ServerMessage::UserJoined { ref user } if user.user_id == "u3"));
    }

    #[test]
    fn decodes_user_left() {
        let msg = decode_server_frame(r#"{"type":"user_left","userId":"u2"}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::UserLeft {
                user_id: "u2".into()
            }
        );
    }

    #[test]
    fn unknown_type_decodes_to_unknown() {
        let msg = decode_server_frame(r#"{"type":"typing","userId":"u1"}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn rejects_non_json() {
        assert!(decode_server_frame("hello there").is_err());
    }

    #[test]
    fn rejects_missing_type() {
        assert!(decode_server_frame(r#"{"count":3}"#).is_err());
    }

    #[test]
    fn rejects_missing_required_field() {
        assert!(decode_server_frame(r#"{"type":"participants"}"#).is_err());
        assert!(decode_server_frame(r#"{"type":"user_left"}"#).is_err());
        assert!(decode_server_frame(r#"{"type":"user_joined","user":{"nickname":"x"}}"#).is_err());
    }

    #[test]
    fn rejects_negative_count() {
        assert!(decode_server_frame(r#"{"type":"participants","count":-1}"#).is_err());
    }

    #[test]
    fn decodes_client_leave_without_session_as_error() {
        assert!(decode_client_frame(r#"{"type":"leave","userId":"u1"}"#).is_err());
    }

    #[test]
    fn join_user_into_participant_drops_session() {
        let user = JoinUser {
            user_id: "u1".into(),
            nickname: "Alice".into(),
            joined_at: "t".into(),
            last_activity: "t".into(),
            session_id: SessionId::for_user("u1", 1),
        };
        let p = user.into_participant();
        assert_eq!(p.user_id, "u1");
        assert_eq!(p.joined_at, "t");
    }
}
