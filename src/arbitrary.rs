use quickcheck::{Arbitrary, Gen};

use crate::apply::{apply, has_follow_up};
use crate::board::Board;
use crate::movegen::{moves_for, moves_for_piece};
use crate::types::{Color, Move};

const MAX_PLIES: usize = 160;

/// A position reached by random legal play from the initial setup,
/// together with the side to move in it.
#[derive(Clone, Debug)]
pub struct PlayedGame {
    pub board: Board,
    pub side: Color,
    pub history: Vec<Move>,
}

impl Arbitrary for PlayedGame {
    fn arbitrary(g: &mut Gen) -> Self {
        let plies = usize::arbitrary(g) % MAX_PLIES;
        let mut board = Board::new();
        let mut side = Color::Red;
        let mut history = Vec::new();
        let mut chain_piece = None;

        for _ in 0..plies {
            let moves = match chain_piece {
                Some(pos) => moves_for_piece(&board, pos),
                None => moves_for(&board, side),
            };
            let Some(mv) = g.choose(&moves).cloned() else {
                break;
            };

            let continues = has_follow_up(&board, &mv);
            board = apply(&board, &mv);
            if continues {
                chain_piece = Some(mv.to);
            } else {
                chain_piece = None;
                side = side.opponent();
            }
            history.push(mv);
        }

        PlayedGame {
            board,
            side,
            history,
        }
    }
}
