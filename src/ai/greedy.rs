use crate::apply::apply;
use crate::board::Board;
use crate::game::MoveSelector;
use crate::rules::material_score;
use crate::types::{Color, Move};

/// One-ply greedy selector: plays the move that leaves the best material
/// balance, preferring the earliest candidate on ties.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialSelector;

impl MoveSelector for MaterialSelector {
    fn select_move(&self, board: &Board, side: Color, candidates: &[Move]) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;

        for (idx, mv) in candidates.iter().enumerate() {
            let score = material_score(&apply(board, mv), side);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((idx, score));
            }
        }

        best.map(|(idx, _)| idx)
    }
}
