pub mod endpoint;
pub mod identity;
pub mod presence;
pub mod protocol;
pub mod roster;
pub mod transport;

pub use endpoint::Endpoint;
pub use identity::CurrentUser;
pub use presence::{
    ConnectionStatus, PresenceClient, PresenceEvent, PresenceSession, SessionEvent,
    SessionOptions,
};
pub use presence_config::JoinPolicy;
pub use protocol::{ClientMessage, JoinUser, Participant, ServerMessage};
pub use roster::{PresenceRoster, RosterChange};
pub use transport::Backoff;
