//! Legal move generation.
//!
//! Captures are searched depth-first without touching the board: the moving
//! piece stays on its start square and jumped pieces stay where they are, so
//! neither can be landed on again within the same chain. A chain is emitted
//! as one [`Move`] once no further jump exists from its current square.
//!
//! Men step forward only but capture in all four diagonals. Capturing is
//! mandatory for the whole side, not just for the piece that can capture.

use crate::board::Board;
use crate::types::{Color, Move, Piece, Position, Rank};

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Legal moves for the piece on `pos`, ignoring what the rest of its side can do.
/// Capture chains, when any exist, are the only moves returned.
pub fn moves_for_piece(board: &Board, pos: Position) -> Vec<Move> {
    let Some(piece) = board.at(pos) else {
        return Vec::new();
    };

    let captures = capture_moves(board, piece);
    if !captures.is_empty() {
        return captures;
    }

    normal_moves(board, piece)
}

/// Legal moves for a whole side, capture-only whenever any piece can capture.
pub fn moves_for(board: &Board, color: Color) -> Vec<Move> {
    let mut captures = Vec::new();
    let mut normal = Vec::new();

    for piece in board.pieces_of(color) {
        let piece_captures = capture_moves(board, piece);
        if piece_captures.is_empty() {
            if captures.is_empty() {
                normal.extend(normal_moves(board, piece));
            }
        } else {
            captures.extend(piece_captures);
        }
    }

    if captures.is_empty() { normal } else { captures }
}

/// Whether `color` has at least one capture anywhere on the board.
pub fn side_has_capture(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|piece| !capture_moves(board, piece).is_empty())
}

/// Every complete capture chain starting from `piece`'s square.
pub fn capture_moves(board: &Board, piece: &Piece) -> Vec<Move> {
    let mut chains = Vec::new();
    let mut captured = Vec::new();
    explore_captures(board, piece, piece.position, &mut captured, &mut chains);
    chains
}

fn explore_captures(
    board: &Board,
    piece: &Piece,
    current: Position,
    captured: &mut Vec<Position>,
    chains: &mut Vec<Move>,
) {
    let mut found = false;

    for (dr, dc) in DIAGONALS {
        let (Some(jumped), Some(landing)) =
            (current.offset(dr, dc), current.offset(2 * dr, 2 * dc))
        else {
            continue;
        };
        if captured.contains(&jumped) {
            continue;
        }
        let is_enemy = board
            .at(jumped)
            .is_some_and(|other| other.color != piece.color);
        if !is_enemy || !board.is_empty_at(landing) {
            continue;
        }

        found = true;
        captured.push(jumped);
        explore_captures(board, piece, landing, captured, chains);
        captured.pop();
    }

    if !found && !captured.is_empty() {
        chains.push(Move::jump(
            piece.position,
            current,
            captured.clone(),
            promotes(piece, current),
        ));
    }
}

fn normal_moves(board: &Board, piece: &Piece) -> Vec<Move> {
    let from = piece.position;
    step_directions(piece)
        .filter_map(|(dr, dc)| from.offset(dr, dc))
        .filter(|&to| board.is_empty_at(to))
        .map(|to| Move::step(from, to, promotes(piece, to)))
        .collect()
}

fn step_directions(piece: &Piece) -> impl Iterator<Item = (i8, i8)> {
    let forward = piece.color.forward();
    let is_king = piece.is_king();
    DIAGONALS
        .into_iter()
        .filter(move |&(dr, _)| is_king || dr == forward)
}

fn promotes(piece: &Piece, to: Position) -> bool {
    piece.rank == Rank::Man && to.row == piece.color.promotion_row()
}
