use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::types::{BOARD_SIZE, Color, Piece, PieceCounts, Position, Rank};

const NUM_SQUARES: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;
const PIECES_PER_SIDE: usize = 12;
const HOME_ROWS: u8 = 3;

/// Checkers board: a row-major array of owned piece records.
///
/// Serialized as the list of pieces on it; decoding goes through
/// [`Board::from_pieces`] so every structural invariant is rechecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Piece>", into = "Vec<Piece>")]
pub struct Board {
    cells: [Option<Piece>; NUM_SQUARES],
}

impl Board {
    /// Creates the standard setup:
    /// black men on the dark squares of rows 0-2, red men on rows 5-7.
    pub fn new() -> Self {
        let mut board = Self::empty();
        let mut id = 0u8;

        for (color, rows) in [
            (Color::Black, 0..HOME_ROWS),
            (Color::Red, BOARD_SIZE - HOME_ROWS..BOARD_SIZE),
        ] {
            for row in rows {
                for col in 0..BOARD_SIZE {
                    let position = Position { row, col };
                    if position.is_dark() {
                        board.cells[position.index()] = Some(Piece {
                            id,
                            color,
                            rank: Rank::Man,
                            position,
                        });
                        id += 1;
                    }
                }
            }
        }

        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [None; NUM_SQUARES],
        }
    }

    /// Builds a board from loose piece records, checking that pieces sit on
    /// distinct dark squares, ids are unique, neither side has more than a
    /// full set and no man stands uncrowned on its promotion row.
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Result<Self, BoardError> {
        let mut board = Self::empty();
        let mut seen_ids = [false; u8::MAX as usize + 1];

        for piece in pieces {
            board.check_placement(&piece)?;
            if std::mem::replace(&mut seen_ids[piece.id as usize], true) {
                return Err(BoardError::DuplicateId(piece.id));
            }
            board.cells[piece.position.index()] = Some(piece);
        }

        for color in [Color::Red, Color::Black] {
            if board.pieces_of(color).count() > PIECES_PER_SIDE {
                return Err(BoardError::TooManyPieces(color));
            }
        }

        Ok(board)
    }

    /// Puts a new piece on `position` with the next free id and returns that id.
    pub fn place(
        &mut self,
        color: Color,
        rank: Rank,
        position: Position,
    ) -> Result<u8, BoardError> {
        let id = self
            .cells
            .iter()
            .flatten()
            .map(|piece| piece.id.saturating_add(1))
            .max()
            .unwrap_or(0);
        let piece = Piece {
            id,
            color,
            rank,
            position,
        };
        self.check_placement(&piece)?;
        if self.pieces_of(color).count() >= PIECES_PER_SIDE {
            return Err(BoardError::TooManyPieces(color));
        }
        self.cells[position.index()] = Some(piece);
        Ok(id)
    }

    /// Bounds-checked lookup. Vacant and off-board squares are both `None`.
    pub fn at(&self, pos: Position) -> Option<&Piece> {
        if !pos.is_on_board() {
            return None;
        }
        self.cells[pos.index()].as_ref()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.at(pos).is_none()
    }

    /// Iterates over the pieces of one side in row-major order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |piece| piece.color == color)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten()
    }

    pub fn count(&self) -> PieceCounts {
        let mut counts = PieceCounts { red: 0, black: 0 };
        for piece in self.pieces() {
            match piece.color {
                Color::Red => counts.red += 1,
                Color::Black => counts.black += 1,
            }
        }
        counts
    }

    /// Converts board to `[u8; 64]` where
    /// 0=empty, 1=red man, 2=black man, 3=red king, 4=black king.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (cell, slot) in board.iter_mut().zip(self.cells.iter()) {
            *cell = match slot {
                None => 0,
                Some(piece) => match (piece.color, piece.rank) {
                    (Color::Red, Rank::Man) => 1,
                    (Color::Black, Rank::Man) => 2,
                    (Color::Red, Rank::King) => 3,
                    (Color::Black, Rank::King) => 4,
                },
            };
        }
        board
    }

    pub(crate) fn take(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_on_board() {
            return None;
        }
        self.cells[pos.index()].take()
    }

    pub(crate) fn put(&mut self, piece: Piece) {
        self.cells[piece.position.index()] = Some(piece);
    }

    fn check_placement(&self, piece: &Piece) -> Result<(), BoardError> {
        let pos = piece.position;
        if !pos.is_on_board() {
            return Err(BoardError::OffBoard(pos));
        }
        if !pos.is_dark() {
            return Err(BoardError::LightSquare(pos));
        }
        if self.at(pos).is_some() {
            return Err(BoardError::SquareTaken(pos));
        }
        if piece.rank == Rank::Man && pos.row == piece.color.promotion_row() {
            return Err(BoardError::UncrownedOnKingRow(pos));
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Piece>> for Board {
    type Error = BoardError;

    fn try_from(pieces: Vec<Piece>) -> Result<Self, Self::Error> {
        Self::from_pieces(pieces)
    }
}

impl From<Board> for Vec<Piece> {
    fn from(board: Board) -> Self {
        board.pieces().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn initial_board_has_twelve_men_per_side_on_dark_squares() {
        let board = Board::new();

        assert_eq!(board.count(), PieceCounts { red: 12, black: 12 });
        assert!(board.pieces().all(|piece| piece.position.is_dark()));
        assert!(board.pieces().all(|piece| piece.rank == Rank::Man));
        assert!(board.pieces_of(Color::Black).all(|piece| piece.position.row < 3));
        assert!(board.pieces_of(Color::Red).all(|piece| piece.position.row > 4));
        assert!((3..5).all(|row| (0..8).all(|col| board.is_empty_at(pos(row, col)))));
    }

    #[test]
    fn piece_ids_are_unique_and_match_their_squares() {
        let board = Board::new();
        let mut ids: Vec<u8> = board.pieces().map(|piece| piece.id).collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 24);
        for piece in board.pieces() {
            assert_eq!(board.at(piece.position), Some(piece));
        }
    }

    #[test]
    fn at_is_none_off_board() {
        let board = Board::new();

        assert!(board.at(Position { row: 8, col: 1 }).is_none());
        assert!(board.at(Position { row: 0, col: 9 }).is_none());
        assert_eq!(board.at(pos(0, 1)).map(|piece| piece.color), Some(Color::Black));
    }

    #[test]
    fn clone_is_independent() {
        let board = Board::new();
        let mut copy = board.clone();

        let _ = copy.take(pos(5, 0));

        assert!(board.at(pos(5, 0)).is_some());
        assert!(copy.at(pos(5, 0)).is_none());
    }

    #[test]
    fn to_array_encodes_color_and_rank() {
        let mut board = Board::empty();
        board.place(Color::Red, Rank::King, pos(3, 4)).unwrap();
        board.place(Color::Black, Rank::Man, pos(4, 5)).unwrap();

        let cells = board.to_array();

        assert_eq!(cells[3 * 8 + 4], 3);
        assert_eq!(cells[4 * 8 + 5], 2);
        assert_eq!(cells.iter().filter(|&&cell| cell != 0).count(), 2);
    }

    #[test]
    fn from_pieces_rejects_structural_violations() {
        let man = |id, color, row, col| Piece {
            id,
            color,
            rank: Rank::Man,
            position: pos(row, col),
        };

        assert_eq!(
            Board::from_pieces([man(0, Color::Red, 4, 4)]),
            Err(BoardError::LightSquare(pos(4, 4)))
        );
        assert_eq!(
            Board::from_pieces([man(0, Color::Red, 4, 3), man(1, Color::Black, 4, 3)]),
            Err(BoardError::SquareTaken(pos(4, 3)))
        );
        assert_eq!(
            Board::from_pieces([man(7, Color::Red, 4, 3), man(7, Color::Black, 2, 3)]),
            Err(BoardError::DuplicateId(7))
        );
        assert_eq!(
            Board::from_pieces([man(0, Color::Red, 0, 1)]),
            Err(BoardError::UncrownedOnKingRow(pos(0, 1)))
        );
    }

    #[test]
    fn serde_roundtrip_goes_through_validation() {
        let board = Board::new();
        let json = serde_json::to_string(&board).unwrap();

        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);

        let bad = r#"[{"id":0,"color":"red","rank":"man","position":{"row":4,"col":4}}]"#;
        assert!(serde_json::from_str::<Board>(bad).is_err());
    }

    #[test]
    fn place_refuses_a_thirteenth_piece() {
        let mut board = Board::new();
        board.place(Color::Red, Rank::King, pos(3, 4)).unwrap_err();

        let mut sparse = Board::empty();
        sparse.place(Color::Red, Rank::King, pos(3, 4)).unwrap();
        assert_eq!(sparse.count().red, 1);
    }

    #[test]
    fn off_board_positions_are_refused() {
        let mut board = Board::empty();
        let outside = Position { row: 8, col: 1 };

        assert_eq!(
            board.place(Color::Red, Rank::King, outside),
            Err(BoardError::OffBoard(outside))
        );
        let far = Position { row: 200, col: 255 };
        assert_eq!(
            board.place(Color::Black, Rank::King, far),
            Err(BoardError::OffBoard(far))
        );
        assert_eq!(
            Board::from_pieces([Piece {
                id: 0,
                color: Color::Red,
                rank: Rank::King,
                position: outside,
            }]),
            Err(BoardError::OffBoard(outside))
        );
        assert_eq!(board, Board::empty());
    }
}
