use tracing::warn;

use crate::board::Board;
use crate::movegen::capture_moves;
use crate::types::{Move, Rank};

/// Returns the board after `mv`. The input board is never modified.
///
/// Captured squares and the origin are cleared and the same piece record is
/// relocated to the destination, crowned when `mv.promotes` is set. An empty
/// origin means the move did not come from the generator; the board is then
/// returned unchanged.
pub fn apply(board: &Board, mv: &Move) -> Board {
    if !mv.to.is_on_board() {
        warn!(from = %mv.from, to = %mv.to, "applied a move that leaves the board");
        return board.clone();
    }

    let mut next = board.clone();

    let Some(mut piece) = next.take(mv.from) else {
        warn!(from = %mv.from, to = %mv.to, "applied a move whose origin is empty");
        return board.clone();
    };

    for &captured in &mv.captured {
        if next.take(captured).is_none() {
            warn!(at = %captured, "captured square was already empty");
        }
    }

    piece.position = mv.to;
    if mv.promotes {
        piece.rank = Rank::King;
    }
    next.put(piece);

    next
}

/// Whether the piece that just made `mv` can keep capturing from where it landed.
pub fn has_follow_up(board: &Board, mv: &Move) -> bool {
    if !mv.is_capture {
        return false;
    }

    let next = apply(board, mv);
    next.at(mv.to)
        .is_some_and(|piece| !capture_moves(&next, piece).is_empty())
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::PlayedGame;
    use crate::movegen::{moves_for, moves_for_piece};
    use crate::types::{Color, Position};

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    /// Looks for a jump from `mv.to` on the board the generator searched,
    /// where the mover still stands on `mv.from` and nothing was removed.
    fn jump_left_during_search(board: &Board, mv: &Move) -> bool {
        let Some(mover) = board.at(mv.from) else {
            return true;
        };
        [(-1, -1), (-1, 1), (1, -1), (1, 1)].into_iter().any(|(dr, dc)| {
            match (mv.to.offset(dr, dc), mv.to.offset(2 * dr, 2 * dc)) {
                (Some(jumped), Some(landing)) => {
                    !mv.captured.contains(&jumped)
                        && board.at(jumped).is_some_and(|other| other.color != mover.color)
                        && board.is_empty_at(landing)
                }
                _ => false,
            }
        })
    }

    quickcheck! {
        fn apply_is_pure(game: PlayedGame) -> bool {
            let before = game.board.clone();
            let copy = game.board.clone();
            moves_for(&game.board, game.side).iter().all(|mv| {
                apply(&game.board, mv) == apply(&copy, mv) && game.board == before
            })
        }

        fn emitted_chains_end_where_no_jump_is_left(game: PlayedGame) -> bool {
            moves_for(&game.board, game.side)
                .iter()
                .filter(|mv| mv.is_capture)
                .all(|mv| !jump_left_during_search(&game.board, mv))
        }

        fn follow_up_agrees_with_destination_captures(game: PlayedGame) -> bool {
            moves_for(&game.board, game.side).iter().all(|mv| {
                let next = apply(&game.board, mv);
                let can_capture = mv.is_capture
                    && moves_for_piece(&next, mv.to).iter().any(|follow| follow.is_capture);
                has_follow_up(&game.board, mv) == can_capture
            })
        }

        fn promotion_lands_on_far_row_only(game: PlayedGame) -> bool {
            moves_for(&game.board, game.side).iter().all(|mv| {
                let mover = game.board.at(mv.from).copied();
                let landed = apply(&game.board, mv).at(mv.to).copied();
                match (mover, landed) {
                    (Some(mover), Some(landed)) => {
                        let on_far_row = mv.to.row == mover.color.promotion_row();
                        mv.promotes == (mover.rank == Rank::Man && on_far_row)
                            && (landed.rank == Rank::King) == (mover.is_king() || mv.promotes)
                            && landed.id == mover.id
                    }
                    _ => false,
                }
            })
        }
    }

    #[test]
    fn apply_moves_piece_and_clears_captures() {
        let mut board = Board::empty();
        let id = board.place(Color::Red, Rank::Man, pos(5, 2)).unwrap();
        board.place(Color::Black, Rank::Man, pos(4, 3)).unwrap();
        let mv = Move::jump(pos(5, 2), pos(3, 4), vec![pos(4, 3)], false);

        let next = apply(&board, &mv);

        assert!(next.is_empty_at(pos(5, 2)));
        assert!(next.is_empty_at(pos(4, 3)));
        let moved = next.at(pos(3, 4)).unwrap();
        assert_eq!(moved.id, id);
        assert_eq!(moved.position, pos(3, 4));
        assert_eq!(board.count().black, 1);
    }

    #[test]
    fn promoting_move_crowns_the_piece() {
        let mut board = Board::empty();
        board.place(Color::Red, Rank::Man, pos(1, 2)).unwrap();

        let next = apply(&board, &Move::step(pos(1, 2), pos(0, 1), true));

        assert_eq!(next.at(pos(0, 1)).unwrap().rank, Rank::King);
    }

    #[test]
    fn empty_origin_returns_unchanged_copy() {
        let board = Board::new();

        let next = apply(&board, &Move::step(pos(4, 1), pos(3, 2), false));

        assert_eq!(next, board);
    }

    #[test]
    fn off_board_destination_returns_unchanged_copy() {
        let board = Board::new();

        let next = apply(&board, &Move::step(pos(5, 0), Position { row: 8, col: 1 }, false));

        assert_eq!(next, board);
    }

    #[test]
    fn empty_captured_square_is_skipped() {
        let mut board = Board::empty();
        let id = board.place(Color::Red, Rank::King, pos(5, 2)).unwrap();
        let mv = Move::jump(pos(5, 2), pos(3, 4), vec![pos(4, 3)], false);

        let next = apply(&board, &mv);

        assert_eq!(next.at(pos(3, 4)).map(|piece| piece.id), Some(id));
        assert_eq!(next.count().red, 1);
    }

    #[test]
    fn ring_of_captures_leaves_a_follow_up_onto_the_start_square() {
        // The king's own start square blocks the fourth jump while searching,
        // so both chains stop after three captures. Once applied, the start
        // square is free and the last jump opens up.
        let mut board = Board::empty();
        board.place(Color::Red, Rank::King, pos(5, 4)).unwrap();
        board.place(Color::Black, Rank::Man, pos(4, 3)).unwrap();
        board.place(Color::Black, Rank::Man, pos(2, 3)).unwrap();
        board.place(Color::Black, Rank::Man, pos(2, 5)).unwrap();
        board.place(Color::Black, Rank::Man, pos(4, 5)).unwrap();

        let mut moves = moves_for_piece(&board, pos(5, 4));
        moves.sort_by_key(|mv| mv.to);

        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].to, pos(3, 2));
        assert_eq!(moves[0].captured, vec![pos(4, 5), pos(2, 5), pos(2, 3)]);
        assert_eq!(moves[1].to, pos(3, 6));
        assert_eq!(moves[1].captured, vec![pos(4, 3), pos(2, 3), pos(2, 5)]);
        assert!(moves.iter().all(|mv| has_follow_up(&board, mv)));
    }

    #[test]
    fn plain_step_has_no_follow_up() {
        let board = Board::new();
        let mv = Move::step(pos(5, 2), pos(4, 3), false);

        assert!(!has_follow_up(&board, &mv));
    }
}
