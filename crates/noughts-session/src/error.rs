//! Error types for the session layer.

use noughts_protocol::{RoomKey, Symbol};
use noughts_room::RoomError;

/// Why a session refused or could not complete an intent.
///
/// All of these are local to one intent. The connection stays open and
/// the room is untouched.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A `play` claimed a symbol other than the one granted on join.
    #[error("session holds {granted}, intent claimed {claimed}")]
    UnauthorizedSymbol { claimed: Symbol, granted: Symbol },

    /// `join` on a session that already belongs to a room.
    #[error("session already bound to room {0}")]
    AlreadyBound(RoomKey),

    /// `play` or `reset` before any successful join.
    #[error("session has not joined a room")]
    NotBound,

    /// The intent names a room this session is not a member of.
    #[error("session is not a member of room {0}")]
    NotInRoom(RoomKey),

    /// The room rejected the operation.
    #[error(transparent)]
    Room(#[from] RoomError),
}
