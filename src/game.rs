use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::apply::{apply, has_follow_up};
use crate::board::Board;
use crate::config::RulesConfig;
use crate::error::{CommitError, ConfigError, InvalidSelection, MalformedImport};
use crate::movegen::{moves_for, moves_for_piece, side_has_capture};
use crate::rules::evaluate_with;
use crate::snapshot;
use crate::types::{Color, GameResult, GameStatus, Move, Phase, PieceCounts, Position};

pub trait MoveSelector: Send + Sync {
    /// Picks one of `candidates` by index. `candidates` is never empty.
    fn select_move(&self, board: &Board, side: Color, candidates: &[Move]) -> Option<usize>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&self, _board: &Board, _side: Color, candidates: &[Move]) -> Option<usize> {
        if candidates.is_empty() { None } else { Some(0) }
    }
}

/// Everything one game session holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current_player: Color,
    pub status: GameStatus,
    pub result: Option<GameResult>,
    pub move_history: Vec<Move>,
    pub selected: Option<Position>,
    /// Legal moves for `selected`; empty when nothing is selected.
    pub legal_moves: Vec<Move>,
    /// Contract:
    /// - `true` exactly when `capture_chain_piece` is set.
    /// - While `true`, `selected` equals `capture_chain_piece`.
    pub must_continue_capture: bool,
    pub capture_chain_piece: Option<Position>,
    /// Incremented once per successful `commit`, so a chain finished over
    /// several calls counts several times.
    pub move_count: u32,
    pub moves_without_capture: u32,
}

impl GameState {
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            board: Board::new(),
            current_player: config.first_player,
            status: GameStatus::Playing,
            result: None,
            move_history: Vec::new(),
            selected: None,
            legal_moves: Vec::new(),
            must_continue_capture: false,
            capture_chain_piece: None,
            move_count: 0,
            moves_without_capture: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.status == GameStatus::Finished {
            Phase::Finished
        } else if self.must_continue_capture {
            Phase::CaptureChain
        } else if self.selected.is_some() {
            Phase::Selected
        } else {
            Phase::Idle
        }
    }
}

pub struct GameInstance {
    state: GameState,
    config: RulesConfig,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    pub fn new(selector: Box<dyn MoveSelector>) -> Self {
        let config = RulesConfig::default();
        Self {
            state: GameState::new(&config),
            config,
            selector,
        }
    }

    pub fn new_with_default_selector() -> Self {
        Self::new(Box::new(FirstLegalMoveSelector))
    }

    pub fn with_config(
        config: RulesConfig,
        selector: Box<dyn MoveSelector>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: GameState::new(&config),
            config,
            selector,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn current_player(&self) -> Color {
        self.state.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn result(&self) -> Option<GameResult> {
        self.state.result
    }

    pub fn selected(&self) -> Option<Position> {
        self.state.selected
    }

    pub fn has_selection(&self) -> bool {
        self.state.selected.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn piece_counts(&self) -> PieceCounts {
        self.state.board.count()
    }

    /// Selects the piece on `pos` for the side to move and computes its moves.
    /// On error the state is left exactly as it was.
    pub fn select(&mut self, pos: Position) -> Result<(), InvalidSelection> {
        let state = &self.state;
        if state.status == GameStatus::Finished {
            return Err(InvalidSelection::GameFinished);
        }

        let piece = state
            .board
            .at(pos)
            .ok_or(InvalidSelection::EmptySquare(pos))?;
        if piece.color != state.current_player {
            return Err(InvalidSelection::OpponentPiece(pos));
        }
        if state.must_continue_capture
            && let Some(chain_piece) = state.capture_chain_piece
            && chain_piece != pos
        {
            return Err(InvalidSelection::ChainInProgress { chain_piece });
        }

        let moves = selection_moves(&state.board, pos, state.current_player);
        trace!(%pos, moves = moves.len(), "selected");

        self.state.selected = Some(pos);
        self.state.legal_moves = moves;
        Ok(())
    }

    /// Clears the selection. A capture chain in progress keeps its piece selected.
    pub fn deselect(&mut self) {
        if !self.state.must_continue_capture {
            self.state.selected = None;
            self.state.legal_moves.clear();
        }
    }

    /// Moves the selected piece to `to` and returns the move that was played.
    /// On error the state is left exactly as it was.
    pub fn commit(&mut self, to: Position) -> Result<Move, CommitError> {
        if self.state.status == GameStatus::Finished {
            return Err(CommitError::GameFinished);
        }
        if self.state.selected.is_none() {
            return Err(CommitError::NoSelection);
        }

        let mv = self
            .state
            .legal_moves
            .iter()
            .find(|mv| mv.to == to)
            .cloned()
            .ok_or(CommitError::IllegalMove { to })?;

        let continues = has_follow_up(&self.state.board, &mv);
        let state = &mut self.state;
        state.board = apply(&state.board, &mv);
        state.move_history.push(mv.clone());
        state.move_count += 1;
        if mv.is_capture {
            state.moves_without_capture = 0;
        } else {
            state.moves_without_capture += 1;
        }

        debug!(
            side = %state.current_player,
            from = %mv.from,
            to = %mv.to,
            captured = mv.captured.len(),
            promotes = mv.promotes,
            "move committed"
        );

        if continues {
            state.must_continue_capture = true;
            state.capture_chain_piece = Some(mv.to);
            state.selected = Some(mv.to);
            state.legal_moves = moves_for_piece(&state.board, mv.to);
            debug!(at = %mv.to, "capture chain continues");
        } else {
            state.must_continue_capture = false;
            state.capture_chain_piece = None;
            state.selected = None;
            state.legal_moves.clear();
            state.current_player = state.current_player.opponent();
        }

        if let Some(result) = evaluate_with(
            &state.board,
            state.current_player,
            state.moves_without_capture,
            &self.config,
        ) {
            state.status = GameStatus::Finished;
            state.result = Some(result);
            debug!(?result, move_count = state.move_count, "game finished");
        }

        Ok(mv)
    }

    pub fn legal_moves_for_selection(&self) -> &[Move] {
        &self.state.legal_moves
    }

    /// All legal moves for `color` on the current board.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        moves_for(&self.state.board, color)
    }

    pub fn all_legal_moves(&self) -> Vec<Move> {
        self.legal_moves(self.state.current_player)
    }

    /// Starts over with a fresh state under the same rules.
    pub fn reset(&mut self) {
        self.state = GameState::new(&self.config);
    }

    pub fn export_snapshot(&self) -> Result<Vec<u8>, serde_json::Error> {
        snapshot::encode(&self.state)
    }

    /// Replaces the state with a decoded and revalidated snapshot.
    /// On error the current state is kept.
    pub fn import_snapshot(&mut self, data: &[u8]) -> Result<(), MalformedImport> {
        let state = snapshot::decode(data, &self.config)?;
        debug!(move_count = state.move_count, "snapshot imported");
        self.state = state;
        Ok(())
    }

    /// Lets the selector play a whole turn for the side to move, continuing
    /// any capture chain until the turn passes or the game ends.
    pub fn do_ai_move(&mut self) -> Result<Vec<Move>, String> {
        if self.state.status == GameStatus::Finished {
            return Err("game is already over".to_string());
        }

        let side = self.state.current_player;
        let mut played = Vec::new();

        loop {
            let chained = self.state.must_continue_capture;
            let candidates = if chained {
                self.state.legal_moves.clone()
            } else {
                self.legal_moves(side)
            };
            if candidates.is_empty() {
                return Err("AI has no legal moves".to_string());
            }

            let selected = self
                .selector
                .select_move(&self.state.board, side, &candidates)
                .ok_or_else(|| "AI could not select a move".to_string())?;
            let mv = candidates
                .get(selected)
                .ok_or_else(|| "AI selected an out-of-range move".to_string())?;

            if !chained {
                self.select(mv.from).map_err(|err| err.to_string())?;
            }
            played.push(self.commit(mv.to).map_err(|err| err.to_string())?);

            if !self.state.must_continue_capture || self.state.status == GameStatus::Finished {
                return Ok(played);
            }
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Color) {
        self.state = GameState::new(&self.config);
        self.state.board = board;
        self.state.current_player = current_player;
    }
}

/// Moves offered for a freshly selected piece: its own moves, or none at all
/// when the side must capture elsewhere.
pub(crate) fn selection_moves(board: &Board, pos: Position, side: Color) -> Vec<Move> {
    let mut moves = moves_for_piece(board, pos);
    if !moves.iter().any(|mv| mv.is_capture) && side_has_capture(board, side) {
        moves.clear();
    }
    moves
}
