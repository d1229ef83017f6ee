use crate::board::Board;
use crate::config::{NO_CAPTURE_DRAW_LIMIT, RulesConfig};
use crate::movegen::moves_for;
use crate::types::{Color, GameResult, Rank};

const MAN_VALUE: i32 = 1;
const KING_VALUE: i32 = 3;

/// Decides whether the game is over with `side` to move, using the default
/// no-capture draw limit. `None` means play continues.
pub fn evaluate(board: &Board, side: Color, moves_without_capture: u32) -> Option<GameResult> {
    evaluate_with(board, side, moves_without_capture, &RulesConfig::default())
}

/// Checks, in order: the no-capture draw, a side without legal moves (which
/// loses unless the opponent is stuck as well), a side without pieces.
pub fn evaluate_with(
    board: &Board,
    side: Color,
    moves_without_capture: u32,
    config: &RulesConfig,
) -> Option<GameResult> {
    if moves_without_capture >= config.no_capture_draw_limit {
        return Some(GameResult::Draw);
    }

    if moves_for(board, side).is_empty() {
        if moves_for(board, side.opponent()).is_empty() {
            return Some(GameResult::Draw);
        }
        return Some(side.opponent().wins());
    }

    if board.pieces_of(side).next().is_none() {
        return Some(side.opponent().wins());
    }

    None
}

/// Whether `color` has beaten its opponent: no pieces or no moves left on the other side.
pub fn has_won(board: &Board, color: Color) -> bool {
    let opponent = color.opponent();
    board.pieces_of(opponent).next().is_none() || moves_for(board, opponent).is_empty()
}

pub fn is_draw(moves_without_capture: u32) -> bool {
    moves_without_capture >= NO_CAPTURE_DRAW_LIMIT
}

/// Material balance from `color`'s point of view: men count 1, kings 3.
pub fn material_score(board: &Board, color: Color) -> i32 {
    board
        .pieces()
        .map(|piece| {
            let value = match piece.rank {
                Rank::Man => MAN_VALUE,
                Rank::King => KING_VALUE,
            };
            if piece.color == color { value } else { -value }
        })
        .sum()
}
