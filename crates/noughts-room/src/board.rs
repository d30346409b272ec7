//! The 3×3 board and pure win/draw evaluation.

use noughts_protocol::{BOARD_CELLS, Cell, Symbol};

use crate::BoardError;

/// Winning lines in evaluation order: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Ongoing,
    Win { symbol: Symbol, line: [usize; 3] },
    Draw,
}

impl Evaluation {
    /// `true` for a win or a draw.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Nine cells, row-major. `Copy`, so every move produces a new board and
/// the previous one stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from raw cells.
    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> [Cell; BOARD_CELLS] {
        self.cells
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Returns a copy of this board with `symbol` placed at `index`.
    ///
    /// # Errors
    /// [`BoardError::OutOfRange`] if `index` is not a cell,
    /// [`BoardError::Occupied`] if the cell already holds a symbol.
    pub fn apply_move(&self, index: usize, symbol: Symbol) -> Result<Board, BoardError> {
        let cell = self.cells.get(index).ok_or(BoardError::OutOfRange(index))?;
        if let Some(holder) = cell {
            return Err(BoardError::Occupied { index, holder: *holder });
        }
        let mut next = *self;
        next.cells[index] = Some(symbol);
        Ok(next)
    }

    /// Checks the lines in [`LINES`] order and reports the first match.
    pub fn evaluate(&self) -> Evaluation {
        for line in LINES {
            let [a, b, c] = line.map(|i| self.cells[i]);
            if let Some(symbol) = a {
                if b == a && c == a {
                    return Evaluation::Win { symbol, line };
                }
            }
        }
        if self.is_full() {
            Evaluation::Draw
        } else {
            Evaluation::Ongoing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Cell = Some(Symbol::X);
    const O: Cell = Some(Symbol::O);
    const E: Cell = None;

    #[test]
    fn test_empty_board_is_ongoing() {
        assert_eq!(Board::new().evaluate(), Evaluation::Ongoing);
    }

    #[test]
    fn test_top_row_win() {
        let board = Board::from_cells([X, X, X, E, E, E, E, E, E]);
        assert_eq!(
            board.evaluate(),
            Evaluation::Win { symbol: Symbol::X, line: [0, 1, 2] }
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board = Board::from_cells([X, O, X, X, O, O, O, X, X]);
        assert_eq!(board.evaluate(), Evaluation::Draw);
    }

    #[test]
    fn test_every_line_is_detected() {
        for line in LINES {
            let mut cells = [E; BOARD_CELLS];
            for i in line {
                cells[i] = O;
            }
            assert_eq!(
                Board::from_cells(cells).evaluate(),
                Evaluation::Win { symbol: Symbol::O, line },
                "line {line:?}"
            );
        }
    }

    #[test]
    fn test_first_line_in_order_wins_when_two_match() {
        // Row 0 and column 0 both complete; rows are checked first.
        let board = Board::from_cells([X, X, X, X, O, O, X, O, O]);
        assert_eq!(
            board.evaluate(),
            Evaluation::Win { symbol: Symbol::X, line: [0, 1, 2] }
        );
    }

    #[test]
    fn test_win_on_last_cell_beats_draw() {
        let board = Board::from_cells([X, O, X, O, X, O, O, X, X]);
        assert!(matches!(board.evaluate(), Evaluation::Win { symbol: Symbol::X, .. }));
    }

    #[test]
    fn test_apply_move_leaves_original_untouched() {
        let before = Board::new();
        let after = before.apply_move(4, Symbol::X).unwrap();
        assert_eq!(before, Board::new());
        assert_eq!(after.cells()[4], X);
    }

    #[test]
    fn test_apply_move_rejects_occupied_cell() {
        let board = Board::new().apply_move(0, Symbol::X).unwrap();
        let err = board.apply_move(0, Symbol::O).unwrap_err();
        assert_eq!(err, BoardError::Occupied { index: 0, holder: Symbol::X });
    }

    #[test]
    fn test_apply_move_rejects_out_of_range() {
        assert_eq!(
            Board::new().apply_move(9, Symbol::X).unwrap_err(),
            BoardError::OutOfRange(9)
        );
    }
}
