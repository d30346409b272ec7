use noughts_protocol::{BOARD_CELLS, Cell, ClientMessage, RoomKey, Seat, ServerMessage, Symbol};

/// How the last game ended, as reported by `gameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won(Symbol),
    Draw,
    OpponentLeft,
}

/// Local mirror of a room, driven only by server messages.
#[derive(Debug, Clone)]
pub struct ClientView {
    room: Option<RoomKey>,
    symbol: Option<Symbol>,
    board: [Cell; BOARD_CELLS],
    players: Vec<Seat>,
    turn: Symbol,
    winner_line: Option<[usize; 3]>,
    outcome: Option<Outcome>,
    /// Set by [`reset`](ClientView::reset) until the fresh board arrives.
    reset_sent: bool,
    status: String,
}

impl Default for ClientView {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientView {
    pub fn new() -> Self {
        Self {
            room: None,
            symbol: None,
            board: [None; BOARD_CELLS],
            players: Vec::new(),
            turn: Symbol::X,
            winner_line: None,
            outcome: None,
            reset_sent: false,
            status: "not in a room".to_string(),
        }
    }

    pub fn room(&self) -> Option<&RoomKey> {
        self.room.as_ref()
    }

    /// The symbol the server granted us, once `joined` arrived.
    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    pub fn board(&self) -> &[Cell; BOARD_CELLS] {
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

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether it is our move on a live board.
    pub fn is_my_turn(&self) -> bool {
        self.symbol == Some(self.turn) && self.outcome.is_none() && self.players.len() == 2
    }

    /// Folds one server message into the view.
    pub fn apply(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::Joined { symbol } => {
                self.symbol = Some(symbol);
                self.status = format!("joined as {symbol}");
            }
            ServerMessage::Full => {
                self.room = None;
                self.symbol = None;
                self.status = "room is full".to_string();
            }
            ServerMessage::State {
                board,
                players,
                turn,
                winner_line,
            } => {
                // Only a reset sends an empty board with the same seats. A join
                // changes the seats and leaves a finished room finished.
                let empty = board.iter().all(Option::is_none);
                if empty && (self.reset_sent || players == self.players) {
                    self.outcome = None;
                }
                if empty {
                    self.reset_sent = false;
                }
                self.board = board;
                self.players = players;
                self.turn = turn;
                self.winner_line = winner_line;
                self.status = self.turn_status();
            }
            ServerMessage::GameOver {
                winner,
                disconnected,
            } => {
                let outcome = match (winner, disconnected) {
                    (_, true) => Outcome::OpponentLeft,
                    (Some(symbol), false) => Outcome::Won(symbol),
                    (None, false) => Outcome::Draw,
                };
                self.outcome = Some(outcome);
                self.status = match outcome {
                    Outcome::Won(symbol) if Some(symbol) == self.symbol => "you win".to_string(),
                    Outcome::Won(symbol) => format!("{symbol} wins"),
                    Outcome::Draw => "draw".to_string(),
                    Outcome::OpponentLeft => "opponent disconnected".to_string(),
                };
            }
        }
    }

    /// Builds a `join` for `room` and remembers it as the active room.
    pub fn join(&mut self, room: impl Into<RoomKey>) -> ClientMessage {
        let room_id = room.into();
        self.room = Some(room_id.clone());
        self.symbol = None;
        self.outcome = None;
        self.reset_sent = false;
        self.status = format!("joining {room_id}");
        ClientMessage::Join { room_id }
    }

    /// A `play` on `index`, or `None` when the server would drop it.
    pub fn play(&self, index: usize) -> Option<ClientMessage> {
        if !self.is_my_turn() || index >= BOARD_CELLS || self.board[index].is_some() {
            tracing::debug!(index, "move not sent");
            return None;
        }
        Some(ClientMessage::Play {
            room_id: self.room.clone()?,
            index,
            symbol: self.symbol?,
        })
    }

    /// A `reset` for the current room, if we hold a seat in one.
    pub fn reset(&mut self) -> Option<ClientMessage> {
        self.symbol?;
        let room_id = self.room.clone()?;
        self.reset_sent = true;
        Some(ClientMessage::Reset { room_id })
    }

    /// The board as a 3x3 text grid followed by the status line.
    ///
    /// Empty cells show their index so a player can type it.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in 0..3 {
            let cells: Vec<String> = (0..3)
                .map(|col| {
                    let index = row * 3 + col;
                    match self.board[index] {
                        Some(symbol) => symbol.to_string(),
                        None => index.to_string(),
                    }
                })
                .collect();
            out.push_str(&format!(" {} \n", cells.join(" | ")));
            if row < 2 {
                out.push_str("---+---+---\n");
            }
        }
        out.push_str(&self.status);
        out
    }

    fn turn_status(&self) -> String {
        match self.outcome {
            Some(_) => self.status.clone(),
            None if self.players.len() < 2 => "waiting for opponent".to_string(),
            None if Some(self.turn) == self.symbol => "your turn".to_string(),
            None => format!("waiting for {}", self.turn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_protocol::PlayerId;

    fn seats() -> Vec<Seat> {
        vec![
            Seat { id: PlayerId(1), symbol: Symbol::X },
            Seat { id: PlayerId(2), symbol: Symbol::O },
        ]
    }

    fn state(board: [Cell; 9], turn: Symbol) -> ServerMessage {
        ServerMessage::State {
            board,
            players: seats(),
            turn,
            winner_line: None,
        }
    }

    /// Joined as `symbol` into a two-player room.
    fn seated(symbol: Symbol) -> ClientView {
        let mut view = ClientView::new();
        view.join("r1");
        view.apply(ServerMessage::Joined { symbol });
        view.apply(state([None; 9], Symbol::X));
        view
    }

    #[test]
    fn test_join_emits_join_intent() {
        let mut view = ClientView::new();
        let msg = view.join("r1");
        assert_eq!(msg, ClientMessage::Join { room_id: RoomKey::from("r1") });
        assert_eq!(view.room().map(RoomKey::as_str), Some("r1"));
        assert!(view.symbol().is_none());
    }

    #[test]
    fn test_play_only_on_own_turn() {
        let x = seated(Symbol::X);
        let o = seated(Symbol::O);

        assert_eq!(
            x.play(4),
            Some(ClientMessage::Play {
                room_id: RoomKey::from("r1"),
                index: 4,
                symbol: Symbol::X,
            })
        );
        assert_eq!(o.play(4), None);
        assert_eq!(o.status(), "waiting for X");
    }

    #[test]
    fn test_play_refuses_occupied_and_out_of_range() {
        let mut view = seated(Symbol::O);
        let mut board = [None; 9];
        board[0] = Some(Symbol::X);
        view.apply(state(board, Symbol::O));

        assert_eq!(view.play(0), None);
        assert_eq!(view.play(9), None);
        assert!(view.play(1).is_some());
    }

    #[test]
    fn test_play_before_join_is_refused() {
        let mut view = ClientView::new();
        assert_eq!(view.play(0), None);
        assert_eq!(view.reset(), None);
    }

    #[test]
    fn test_waiting_for_opponent() {
        let mut view = ClientView::new();
        view.join("r1");
        view.apply(ServerMessage::Joined { symbol: Symbol::X });
        view.apply(ServerMessage::State {
            board: [None; 9],
            players: vec![Seat { id: PlayerId(1), symbol: Symbol::X }],
            turn: Symbol::X,
            winner_line: None,
        });
        assert_eq!(view.status(), "waiting for opponent");
        assert_eq!(view.play(0), None);
    }

    #[test]
    fn test_full_is_reported() {
        let mut view = ClientView::new();
        view.join("r1");
        view.apply(ServerMessage::Full);
        assert_eq!(view.status(), "room is full");
        assert!(view.room().is_none());
        assert_eq!(view.reset(), None);
    }

    #[test]
    fn test_game_over_blocks_moves_until_reset() {
        let mut view = seated(Symbol::X);
        let mut board = [None; 9];
        for i in [0, 1, 2] {
            board[i] = Some(Symbol::X);
        }
        board[3] = Some(Symbol::O);
        board[4] = Some(Symbol::O);
        view.apply(ServerMessage::State {
            board,
            players: seats(),
            turn: Symbol::O,
            winner_line: Some([0, 1, 2]),
        });
        view.apply(ServerMessage::GameOver {
            winner: Some(Symbol::X),
            disconnected: false,
        });

        assert_eq!(view.outcome(), Some(Outcome::Won(Symbol::X)));
        assert_eq!(view.status(), "you win");
        assert_eq!(view.winner_line(), Some([0, 1, 2]));
        assert_eq!(view.play(5), None);
        assert!(view.reset().is_some());

        view.apply(state([None; 9], Symbol::X));
        assert_eq!(view.outcome(), None);
        assert!(view.play(5).is_some());
    }

    #[test]
    fn test_newcomer_after_abandon_keeps_game_over() {
        let mut view = seated(Symbol::X);
        view.apply(ServerMessage::GameOver {
            winner: None,
            disconnected: true,
        });

        // O left before any move; a newcomer takes the free seat.
        let newcomer = vec![
            Seat { id: PlayerId(1), symbol: Symbol::X },
            Seat { id: PlayerId(3), symbol: Symbol::O },
        ];
        view.apply(ServerMessage::State {
            board: [None; 9],
            players: newcomer.clone(),
            turn: Symbol::X,
            winner_line: None,
        });
        assert_eq!(view.outcome(), Some(Outcome::OpponentLeft));
        assert_eq!(view.play(0), None);
        assert!(view.reset().is_some());

        // The reset broadcast keeps the seats and reopens the board.
        view.apply(ServerMessage::State {
            board: [None; 9],
            players: newcomer,
            turn: Symbol::X,
            winner_line: None,
        });
        assert_eq!(view.outcome(), None);
        assert!(view.play(0).is_some());
    }

    #[test]
    fn test_own_reset_reopens_board_for_lone_player() {
        let mut view = seated(Symbol::X);
        view.apply(ServerMessage::GameOver {
            winner: None,
            disconnected: true,
        });

        let msg = view.reset();
        assert_eq!(msg, Some(ClientMessage::Reset { room_id: RoomKey::from("r1") }));
        view.apply(ServerMessage::State {
            board: [None; 9],
            players: vec![Seat { id: PlayerId(1), symbol: Symbol::X }],
            turn: Symbol::X,
            winner_line: None,
        });
        assert_eq!(view.outcome(), None);
        assert_eq!(view.status(), "waiting for opponent");
    }

    #[test]
    fn test_opponent_disconnect_outcome() {
        let mut view = seated(Symbol::O);
        view.apply(ServerMessage::GameOver {
            winner: None,
            disconnected: true,
        });
        assert_eq!(view.outcome(), Some(Outcome::OpponentLeft));
        assert_eq!(view.status(), "opponent disconnected");
    }

    #[test]
    fn test_applies_messages_decoded_from_json() {
        let mut view = seated(Symbol::X);
        let msg: ServerMessage = serde_json::from_str(
            r#"{"type":"state","board":[null,"X",null,null,"O",null,null,null,null],
                "players":[{"id":1,"symbol":"X"},{"id":2,"symbol":"O"}],"turn":"X"}"#,
        )
        .unwrap();
        view.apply(msg);
        assert_eq!(view.board()[1], Some(Symbol::X));
        assert_eq!(view.board()[4], Some(Symbol::O));
        assert!(view.is_my_turn());
    }

    #[test]
    fn test_render_grid() {
        let mut view = seated(Symbol::X);
        let mut board = [None; 9];
        board[0] = Some(Symbol::X);
        board[4] = Some(Symbol::O);
        view.apply(state(board, Symbol::X));

        let expected = " X | 1 | 2 \n---+---+---\n 3 | O | 5 \n---+---+---\n 6 | 7 | 8 \nyour turn";
        assert_eq!(view.render(), expected);
    }
}
