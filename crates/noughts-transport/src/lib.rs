//! Transport layer for Noughts.
//!
//! The server loop only sees [`Connection`]: frames of bytes in and out of
//! one peer. Delivery is the transport's only job; it knows nothing about
//! rooms or players.
//!
//! Accepting is split in two. [`WebSocketTransport::accept`] returns as soon
//! as a TCP peer arrives, and the WebSocket upgrade runs on the caller's
//! task under a deadline via [`PendingHandshake::upgrade`], so a peer that
//! never completes the handshake holds up nobody else.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{PendingHandshake, WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::future::Future;

/// Process-unique identifier of an accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One established peer that exchanges whole frames.
///
/// `send` and `recv` may run concurrently from different tasks: a room
/// broadcast can be written while the handler is parked in `recv`. The
/// futures are `Send` so generic handlers can be spawned.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&self, data: &[u8]) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Next frame from the peer, or `Ok(None)` once it closed cleanly.
    fn recv(&self) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn id(&self) -> ConnectionId;
}
