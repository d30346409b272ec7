//! Room configuration and lifecycle status.

use std::fmt;

/// Default command channel size for room actors.
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Settings shared by every room a registry creates.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Capacity of each room actor's command channel. When it fills up,
    /// callers wait (bounded channel).
    pub channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }
}

/// The lifecycle status of a room.
///
/// ```text
/// WaitingForPlayers ──(2nd join)──→ InProgress ──(win/draw/disconnect)──→ Finished
///         ↑                                                                  │
///         └──────────────(reset with < 2 players)────────────────────────────┤
///                         (reset with 2 players) → InProgress ←──────────────┘
/// ```
///
/// Only `reset` leaves `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    WaitingForPlayers,
    InProgress,
    Finished,
}

impl RoomStatus {
    /// Returns `true` while moves are accepted.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
