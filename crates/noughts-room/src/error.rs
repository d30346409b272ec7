//! Error types for the room layer.

use noughts_protocol::{PlayerId, RoomKey, Symbol};

use crate::RoomStatus;

/// A move the board itself refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell {0} is off the board")]
    OutOfRange(usize),

    #[error("cell {index} is already taken by {holder}")]
    Occupied { index: usize, holder: Symbol },
}

/// Errors that can occur during room operations.
///
/// All of them reject a single intent; none leaves the room changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// Bad index or occupied cell.
    #[error("invalid move: {0}")]
    InvalidMove(#[from] BoardError),

    /// The mover's symbol is not the one whose turn it is.
    #[error("not {0}'s turn")]
    NotYourTurn(Symbol),

    /// Both seats are taken.
    #[error("room {0} is full")]
    RoomFull(RoomKey),

    /// Moves are only accepted while the game is in progress.
    #[error("room is {0}, not in progress")]
    RoomNotInProgress(RoomStatus),

    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomKey),

    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomKey),

    /// The room's actor task is gone or its command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomKey),
}
