//! Core protocol types for the Noughts wire format.
//!
//! Every type here is serialized to JSON, sent over the socket, and decoded
//! on the other side. Both message enums are *internally tagged*: the
//! variant name travels in a `"type"` field next to the payload fields, and
//! all names are camelCase so browser clients can use them as-is:
//!
//! ```text
//! {"type":"play","roomId":"r1","index":4,"symbol":"X"}
//! {"type":"gameOver","winner":null,"disconnected":true}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Number of cells on the board (3×3, row-major).
pub const BOARD_CELLS: usize = 9;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A server-assigned identifier for one connected participant.
///
/// Serialized as a plain number (`#[serde(transparent)]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The caller-supplied key of a room.
///
/// Opaque to the server: any non-empty string names a room, and the first
/// join with an unknown key creates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    /// Wraps a raw room identifier.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for RoomKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Symbols and seats
// ---------------------------------------------------------------------------

/// The mark a player places; also names whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// Returns the opposing symbol.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::O => f.write_str("O"),
        }
    }
}

/// One board cell: empty (`null` on the wire) or holding a symbol.
pub type Cell = Option<Symbol>;

/// A room member and the symbol granted to them on join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: PlayerId,
    pub symbol: Symbol,
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who an outbound message is addressed to within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every current member of the room.
    All,
    /// One specific member.
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// Inbound: client → server
// ---------------------------------------------------------------------------

/// Intents a client may send. This is a closed set: anything that does not
/// decode into one of these variants never reaches room logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// "Put me in this room", creating it if the key is new.
    Join { room_id: RoomKey },

    /// "Place my symbol on cell `index`." `symbol` must be the one the
    /// server granted this connection on join.
    Play {
        room_id: RoomKey,
        index: usize,
        symbol: Symbol,
    },

    /// "Start this room over with an empty board."
    Reset { room_id: RoomKey },
}

impl ClientMessage {
    /// The room the intent targets.
    pub fn room_id(&self) -> &RoomKey {
        match self {
            Self::Join { room_id }
            | Self::Play { room_id, .. }
            | Self::Reset { room_id } => room_id,
        }
    }

    /// Short name of the intent, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Play { .. } => "play",
            Self::Reset { .. } => "reset",
        }
    }

    /// Checks the protocol-level rules serde cannot express.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] for an empty room id or a
    /// cell index outside the board.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.room_id().as_str().is_empty() {
            return Err(ProtocolError::InvalidMessage(format!(
                "{} with empty roomId",
                self.kind()
            )));
        }
        if let Self::Play { index, .. } = self {
            if *index >= BOARD_CELLS {
                return Err(ProtocolError::InvalidMessage(format!(
                    "cell index {index} out of range 0..{BOARD_CELLS}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Outbound: server → client
// ---------------------------------------------------------------------------

/// Messages the server sends to room members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Your join succeeded and this is your symbol.
    Joined { symbol: Symbol },

    /// The room already has two players.
    Full,

    /// Authoritative snapshot of the room.
    State {
        board: [Cell; BOARD_CELLS],
        players: Vec<Seat>,
        turn: Symbol,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner_line: Option<[usize; 3]>,
    },

    /// The game reached a terminal outcome. `winner` is `None` on a draw
    /// and when the game ended because a player disconnected.
    GameOver {
        winner: Option<Symbol>,
        disconnected: bool,
    },
}
