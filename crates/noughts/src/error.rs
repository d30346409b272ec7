//! Unified error type for the Noughts server.

use noughts_protocol::ProtocolError;
use noughts_room::RoomError;
use noughts_session::SessionError;
use noughts_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum NoughtsError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (binding, authorization).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (full, wrong turn, not in progress).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}
