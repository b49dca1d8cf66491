use serde::{Deserialize, Serialize};

/// The signed-in user, as handed over by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: String,
    pub nickname: String,
}

impl CurrentUser {
    pub fn new(user_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            nickname: nickname.into(),
        }
    }

    /// Both fields are present. An incomplete identity never connects.
    pub fn is_complete(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.nickname.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_identity() {
        assert!(CurrentUser::new("u1", "Alice").is_complete());
    }

    #[test]
    fn blank_fields_are_incomplete() {
        assert!(!CurrentUser::new("", "Alice").is_complete());
        assert!(!CurrentUser::new("u1", "").is_complete());
        assert!(!CurrentUser::new("u1", "   ").is_complete());
        assert!(!CurrentUser::default().is_complete());
    }
}
