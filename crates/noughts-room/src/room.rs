//! One game instance: two seats, a board, whose turn it is, and the
//! lifecycle status.
//!
//! `Room` is plain data with synchronous operations. It never talks to the
//! network; the actor in [`crate::actor`] owns one and turns each
//! successful operation into broadcasts.

use noughts_protocol::{PlayerId, RoomKey, Seat, ServerMessage, Symbol};

use crate::{Board, Evaluation, RoomError, RoomStatus};

/// Seats per room.
pub const MAX_PLAYERS: usize = 2;

/// What a disconnect did to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The game was in progress and is now `Finished`.
    Abandoned,
    /// The seat was freed; the game was not running.
    Left,
}

#[derive(Debug, Clone)]
pub struct Room {
    key: RoomKey,
    board: Board,
    /// Join order.
    players: Vec<Seat>,
    turn: Symbol,
    winner_line: Option<[usize; 3]>,
    status: RoomStatus,
}

impl Room {
    pub fn new(key: RoomKey) -> Self {
        Self {
            key,
            board: Board::new(),
            players: Vec::with_capacity(MAX_PLAYERS),
            turn: Symbol::X,
            winner_line: None,
            status: RoomStatus::WaitingForPlayers,
        }
    }

    pub fn key(&self) -> &RoomKey {
        &self.key
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Seat] {
        &self.players
    }

    pub fn turn(&self) -> Symbol {
        self.turn
    }

    pub fn winner_line(&self) -> Option<[usize; 3]> {
        self.winner_line
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// The symbol held by `player`, if they have a seat.
    pub fn symbol_of(&self, player: PlayerId) -> Option<Symbol> {
        self.players
            .iter()
            .find(|seat| seat.id == player)
            .map(|seat| seat.symbol)
    }

    /// Seats `player` and returns their symbol.
    ///
    /// The symbol is `X` unless a remaining member already holds it, so in
    /// a fresh room the first joiner is `X` and the second `O`. Filling the
    /// second seat of a waiting room starts the game.
    pub fn join(&mut self, player: PlayerId) -> Result<Symbol, RoomError> {
        if self.symbol_of(player).is_some() {
            return Err(RoomError::AlreadyInRoom(player, self.key.clone()));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull(self.key.clone()));
        }

        let symbol = if self.players.iter().any(|s| s.symbol == Symbol::X) {
            Symbol::O
        } else {
            Symbol::X
        };
        self.players.push(Seat { id: player, symbol });

        if self.players.len() == MAX_PLAYERS
            && self.status == RoomStatus::WaitingForPlayers
        {
            self.status = RoomStatus::InProgress;
        }
        Ok(symbol)
    }

    /// Places the mover's symbol at `index`.
    ///
    /// On a win or draw the room becomes `Finished` (recording the winning
    /// line); otherwise the turn passes to the other symbol. A rejected
    /// move leaves every field as it was.
    pub fn play(&mut self, player: PlayerId, index: usize) -> Result<Evaluation, RoomError> {
        let symbol = self
            .symbol_of(player)
            .ok_or_else(|| RoomError::NotInRoom(player, self.key.clone()))?;
        if !self.status.is_in_progress() {
            return Err(RoomError::RoomNotInProgress(self.status));
        }
        if symbol != self.turn {
            return Err(RoomError::NotYourTurn(symbol));
        }

        self.board = self.board.apply_move(index, symbol)?;

        let evaluation = self.board.evaluate();
        match evaluation {
            Evaluation::Win { line, .. } => {
                self.winner_line = Some(line);
                self.status = RoomStatus::Finished;
            }
            Evaluation::Draw => self.status = RoomStatus::Finished,
            Evaluation::Ongoing => self.turn = self.turn.other(),
        }
        Ok(evaluation)
    }

    /// Frees `player`'s seat. A game in progress is forced to `Finished`.
    pub fn disconnect(&mut self, player: PlayerId) -> Result<Departure, RoomError> {
        let before = self.players.len();
        self.players.retain(|seat| seat.id != player);
        if self.players.len() == before {
            return Err(RoomError::NotInRoom(player, self.key.clone()));
        }

        if self.status.is_in_progress() {
            self.status = RoomStatus::Finished;
            Ok(Departure::Abandoned)
        } else {
            Ok(Departure::Left)
        }
    }

    /// Clears the board for a new game. Any member may ask, at any time.
    pub fn reset(&mut self, requester: PlayerId) -> Result<(), RoomError> {
        if self.symbol_of(requester).is_none() {
            return Err(RoomError::NotInRoom(requester, self.key.clone()));
        }

        self.board = Board::new();
        self.winner_line = None;
        self.turn = Symbol::X;
        self.status = if self.players.len() == MAX_PLAYERS {
            RoomStatus::InProgress
        } else {
            RoomStatus::WaitingForPlayers
        };
        Ok(())
    }

    /// Snapshot for the `state` broadcast.
    pub fn state_message(&self) -> ServerMessage {
        ServerMessage::State {
            board: self.board.cells(),
            players: self.players.clone(),
            turn: self.turn,
            winner_line: self.winner_line,
        }
    }
}
