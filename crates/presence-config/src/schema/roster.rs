//! Roster reconciliation settings.

use serde::{Deserialize, Serialize};

/// How a `user_joined` for an already-listed user is folded into the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// Replace the existing entry with the same `userId`; count only grows for new users.
    #[default]
    Upsert,
    /// Always append and bump the count, even if the user is already listed.
    Append,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub join_policy: JoinPolicy,
}
