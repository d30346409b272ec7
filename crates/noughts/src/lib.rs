//! # Noughts
//!
//! Two-player tic-tac-toe rooms over WebSocket.
//!
//! Players join a room by key, alternate moves under server-enforced turn
//! order and receive the authoritative board after every change. The
//! server decides wins, draws and abandoned games.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use noughts::prelude::*;
//!
//! # async fn run() -> Result<(), NoughtsError> {
//! noughts::init_tracing();
//! let server = NoughtsServerBuilder::from_config(ServerConfig::from_env()?)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{
    DEFAULT_HANDSHAKE_TIMEOUT, ENV_BIND, ENV_HANDSHAKE_TIMEOUT_SECS, ENV_IDLE_TIMEOUT_SECS,
    ENV_ROOM_CHANNEL_SIZE, ServerConfig,
};
pub use error::NoughtsError;
pub use server::{NoughtsServer, NoughtsServerBuilder};

pub use noughts_protocol as protocol;
pub use noughts_room as room;
pub use noughts_session as session;
pub use noughts_transport as transport;

/// Installs a `tracing` subscriber filtered by `RUST_LOG`, defaulting to
/// `info`. Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub mod prelude {
    pub use crate::{NoughtsError, NoughtsServer, NoughtsServerBuilder, ServerConfig};
    pub use noughts_protocol::{
        ClientMessage, Codec, JsonCodec, PlayerId, RoomKey, Seat, ServerMessage, Symbol,
    };
    pub use noughts_room::{RoomRegistry, RoomStatus};
}
