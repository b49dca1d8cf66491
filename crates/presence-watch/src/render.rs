//! Human-readable lines for presence events.

use presence_client::{ConnectionStatus, PresenceEvent, PresenceRoster};

/// `3 viewing: Alice, Bo, Cho`, or `0 viewing` for an empty page.
pub fn roster_line(roster: &PresenceRoster) -> String {
    if roster.users.is_empty() {
        return format!("{} viewing", roster.count);
    }
    let names: Vec<&str> = roster.users.iter().map(|u| u.nickname.as_str()).collect();
    format!("{} viewing: {}", roster.count, names.join(", "))
}

pub fn status_label(status: ConnectionStatus) -> String {
    match status {
        ConnectionStatus::Idle => "idle".into(),
        ConnectionStatus::Connecting => "connecting".into(),
        ConnectionStatus::Open => "online".into(),
        ConnectionStatus::Reconnecting { attempt } => format!("reconnecting (attempt {attempt})"),
        ConnectionStatus::Closed => "closed".into(),
        ConnectionStatus::GaveUp { attempts } => {
            format!("presence unavailable after {attempts} retries")
        }
    }
}

/// Line to print for an event, if it is worth printing.
///
/// `GaveUp` is already covered by its status change.
pub fn describe(event: &PresenceEvent) -> Option<String> {
    match event {
        PresenceEvent::Status(status) => Some(format!("[{}]", status_label(*status))),
        PresenceEvent::RosterChanged(roster) => Some(roster_line(roster)),
        PresenceEvent::UserJoined(user) => Some(format!("+ {} ({})", user.nickname, user.user_id)),
        PresenceEvent::UserLeft { user_id } => Some(format!("- {user_id}")),
        PresenceEvent::Error(message) => Some(format!("! {message}")),
        PresenceEvent::Connected { .. }
        | PresenceEvent::Disconnected
        | PresenceEvent::GaveUp { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_client::Participant;

    fn user(id: &str, nick: &str) -> Participant {
        Participant {
            user_id: id.into(),
            nickname: nick.into(),
            joined_at: String::new(),
            last_activity: String::new(),
        }
    }

    #[test]
    fn roster_line_lists_nicknames() {
        let roster = PresenceRoster {
            count: 2,
            users: vec![user("u1", "Alice"), user("u2", "Bo")],
        };
        assert_eq!(roster_line(&roster), "2 viewing: Alice, Bo");
    }

    #[test]
    fn roster_line_count_only() {
        let roster = PresenceRoster {
            count: 7,
            users: vec![],
        };
        assert_eq!(roster_line(&roster), "7 viewing");
    }

    #[test]
    fn gave_up_reads_as_unavailable() {
        let line = describe(&PresenceEvent::Status(ConnectionStatus::GaveUp { attempts: 6 }));
        assert_eq!(line.as_deref(), Some("[presence unavailable after 6 retries]"));
        assert_eq!(describe(&PresenceEvent::GaveUp { attempts: 6 }), None);
    }

    #[test]
    fn join_and_leave_lines() {
        assert_eq!(
            describe(&PresenceEvent::UserJoined(user("u3", "Cho"))).as_deref(),
            Some("+ Cho (u3)")
        );
        assert_eq!(
            describe(&PresenceEvent::UserLeft {
                user_id: "u3".into()
            })
            .as_deref(),
            Some("- u3")
        );
    }
}
