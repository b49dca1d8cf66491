//! Page presence sessions.
//!
//! A [`PresenceSession`] is one page view's membership: it connects to the
//! page-scoped socket, announces `join`, and mirrors the server's roster
//! until it is closed. [`PresenceClient`] owns at most one session and
//! swaps it whenever the page or the user changes.

mod client;
pub(crate) mod helpers;
mod session;
mod types;


pub use client::PresenceClient;
pub use session::PresenceSession;
pub use types::{ConnectionStatus, PresenceEvent, SessionEvent, SessionOptions};
