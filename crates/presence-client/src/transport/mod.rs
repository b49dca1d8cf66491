//! WebSocket transport for presence sessions.
//!
//! One background task per session owns the socket and the roster. It
//! sends `join` on every successful open, folds inbound frames into the
//! roster in receipt order, and sends `leave` when the session is closed
//! while the socket is still up. Dropped connections are retried with
//! bounded exponential backoff.

mod backoff;
mod connection;
mod handler;
mod link;

pub use backoff::Backoff;
pub(crate) use connection::{connection_loop, ConnectionParams};
pub(crate) use link::SessionLink;
