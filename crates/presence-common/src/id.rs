use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identity of one connection instance: `"{user_id}-{created_at_ms}"`.
///
/// Lives exactly as long as the connection it was minted for and is never
/// persisted. Two tabs of the same user get distinct ids because they were
/// created at different instants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn for_user(user_id: &str, created_at_ms: i64) -> Self {
        Self(format!("{user_id}-{created_at_ms}"))
    }

    /// Mint a session id stamped with the current wall-clock time.
    pub fn now(user_id: &str) -> Self {
        Self::for_user(user_id, chrono::Utc::now().timestamp_millis())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
