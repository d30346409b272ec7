use std::net::SocketAddr;
use std::time::Duration;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listener could not be bound to the requested address.
    #[error("bind to {addr} failed: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The peer sent something other than a valid WebSocket upgrade.
    #[error("handshake with {addr} failed: {source}")]
    HandshakeFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The peer did not finish the upgrade in time.
    #[error("handshake with {addr} timed out after {after:?}")]
    HandshakeTimedOut { addr: SocketAddr, after: Duration },

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
