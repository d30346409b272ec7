//! `NoughtsServer` builder and server loop.
//!
//! This is the entry point for running a Noughts server. It ties together
//! all the layers: transport → protocol → session → room.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use noughts_protocol::{Codec, JsonCodec};
use noughts_room::RoomRegistry;
use noughts_transport::{PendingHandshake, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{NoughtsError, ServerConfig};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Arc<RoomRegistry>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) handshake_timeout: Duration,
}

/// Builder for configuring and starting a Noughts server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn run() -> Result<(), noughts::NoughtsError> {
/// let server = noughts::NoughtsServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct NoughtsServerBuilder {
    config: ServerConfig,
}

impl NoughtsServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(ServerConfig::default())
    }

    /// Starts from an existing configuration, e.g. [`ServerConfig::from_env`].
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the command channel capacity of each room.
    pub fn room_channel_size(mut self, size: usize) -> Self {
        self.config.room_channel_size = size;
        self
    }

    /// Closes connections idle for longer than `timeout`.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Drops TCP peers that have not upgraded to WebSocket within `timeout`.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.config.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<NoughtsServer<JsonCodec>, NoughtsError> {
        if self.config.room_channel_size == 0 {
            return Err(NoughtsError::Config(
                "room channel size must be at least 1".into(),
            ));
        }
        if self.config.handshake_timeout.is_zero() {
            return Err(NoughtsError::Config(
                "handshake timeout must be non-zero".into(),
            ));
        }

        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let state = Arc::new(ServerState {
            registry: Arc::new(RoomRegistry::new(self.config.room_config())),
            codec: JsonCodec,
            idle_timeout: self.config.idle_timeout,
            handshake_timeout: self.config.handshake_timeout,
        });

        Ok(NoughtsServer { transport, state })
    }
}

impl Default for NoughtsServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Noughts server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct NoughtsServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> NoughtsServer<C> {
    /// Creates a new builder.
    pub fn builder() -> NoughtsServerBuilder {
        NoughtsServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// The registry every connection shares.
    pub fn registry(&self) -> Arc<RoomRegistry> {
        Arc::clone(&self.state.registry)
    }

    /// Runs the server accept loop until the process is terminated.
    ///
    /// The loop only takes TCP peers off the listener. The WebSocket
    /// upgrade and everything after it run on a task per connection.
    pub async fn run(self) -> Result<(), NoughtsError> {
        tracing::info!(addr = ?self.local_addr().ok(), "Noughts server running");

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(upgrade_and_handle(pending, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

async fn upgrade_and_handle<C: Codec>(pending: PendingHandshake, state: Arc<ServerState<C>>) {
    let peer = pending.peer_addr();
    match pending.upgrade(state.handshake_timeout).await {
        Ok(conn) => handle_connection(conn, state).await,
        Err(e) => tracing::debug!(%peer, error = %e, "handshake abandoned"),
    }
}
