//! Rooms for Noughts.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its board,
//! seats and lifecycle status.
//!
//! # Key types
//!
//! - [`Board`]: the 3×3 grid and pure win/draw evaluation
//! - [`Room`]: the two-player state machine
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomRegistry`]: creates rooms lazily by key and keeps them
//! - [`RoomStatus`]: `WaitingForPlayers → InProgress → Finished`

mod actor;
mod board;
mod config;
mod error;
mod registry;
mod room;

pub use actor::{PlayerSender, RoomHandle, RoomInfo};
pub use board::{Board, Evaluation, LINES};
pub use config::{DEFAULT_CHANNEL_SIZE, RoomConfig, RoomStatus};
pub use error::{BoardError, RoomError};
pub use registry::RoomRegistry;
pub use room::{Departure, MAX_PLAYERS, Room};
