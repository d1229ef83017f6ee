//! Opaque save format for a [`GameState`].
//!
//! Layout: a 20-byte header followed by a JSON payload.
//!
//! | offset | size | field                       |
//! |--------|------|-----------------------------|
//! | 0      | 4    | magic `CKRS`                |
//! | 4      | 4    | version (u32 LE)            |
//! | 8      | 4    | payload length (u32 LE)     |
//! | 12     | 4    | CRC32 of the payload (LE)   |
//! | 16     | 4    | reserved, zero              |
//!
//! Decoding never trusts the payload: the board is rebuilt through its
//! structural checks and the game fields are checked against the rules
//! before the state is handed out.

use tracing::warn;

use crate::config::RulesConfig;
use crate::error::MalformedImport;
use crate::game::{GameState, selection_moves};
use crate::movegen::{capture_moves, moves_for_piece};
use crate::rules::evaluate_with;
use crate::types::GameStatus;

const MAGIC: &[u8; 4] = b"CKRS";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 20;

pub fn encode(state: &GameState) -> Result<Vec<u8>, serde_json::Error> {
    let payload = serde_json::to_vec(state)?;
    let crc = crc32fast::hash(&payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&payload);
    debug_assert_eq!(out.len(), HEADER_SIZE + payload.len());
    Ok(out)
}

pub fn decode(data: &[u8], config: &RulesConfig) -> Result<GameState, MalformedImport> {
    let result = decode_unchecked(data).and_then(|state| revalidate(state, config));
    if let Err(err) = &result {
        warn!(%err, "rejected snapshot");
    }
    result
}

fn decode_unchecked(data: &[u8]) -> Result<GameState, MalformedImport> {
    if data.len() < HEADER_SIZE {
        return Err(MalformedImport::TooShort { len: data.len() });
    }
    if &data[0..4] != MAGIC {
        return Err(MalformedImport::BadMagic);
    }

    let version = read_u32_le(data, 4);
    if version != VERSION {
        return Err(MalformedImport::UnsupportedVersion(version));
    }

    let declared = read_u32_le(data, 8) as usize;
    let payload = &data[HEADER_SIZE..];
    if declared != payload.len() {
        return Err(MalformedImport::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    let expected = read_u32_le(data, 12);
    let actual = crc32fast::hash(payload);
    if actual != expected {
        return Err(MalformedImport::ChecksumMismatch { expected, actual });
    }

    Ok(serde_json::from_slice(payload)?)
}

/// Checks the game fields against each other and against the board, then
/// recomputes the selection's legal moves instead of trusting the stored ones.
fn revalidate(mut state: GameState, config: &RulesConfig) -> Result<GameState, MalformedImport> {
    use MalformedImport::Inconsistent;

    match (state.status, state.result) {
        (GameStatus::Playing, None) | (GameStatus::Finished, Some(_)) => {}
        _ => return Err(Inconsistent("status and result disagree")),
    }
    if state.move_history.len() != state.move_count as usize {
        return Err(Inconsistent("move history length differs from move count"));
    }
    if state
        .move_history
        .iter()
        .any(|mv| mv.is_capture == mv.captured.is_empty())
    {
        return Err(Inconsistent("history move capture flag disagrees with its captures"));
    }
    let quiet_run = state
        .move_history
        .iter()
        .rev()
        .take_while(|mv| !mv.is_capture)
        .count();
    if state.moves_without_capture as usize != quiet_run {
        return Err(Inconsistent("moves without capture do not match the history"));
    }
    if state.must_continue_capture != state.capture_chain_piece.is_some() {
        return Err(Inconsistent("capture chain flag and chain piece disagree"));
    }

    if let Some(chain_piece) = state.capture_chain_piece {
        if state.selected != Some(chain_piece) {
            return Err(Inconsistent("selection is not the capture chain piece"));
        }
        let can_capture = state
            .board
            .at(chain_piece)
            .is_some_and(|piece| !capture_moves(&state.board, piece).is_empty());
        if !can_capture {
            return Err(Inconsistent("capture chain piece has nothing to capture"));
        }
    }

    if let Some(selected) = state.selected {
        let owned = state
            .board
            .at(selected)
            .is_some_and(|piece| piece.color == state.current_player);
        if !owned {
            return Err(Inconsistent("selection is not a piece of the side to move"));
        }
    }

    let verdict = evaluate_with(
        &state.board,
        state.current_player,
        state.moves_without_capture,
        config,
    );
    match state.status {
        GameStatus::Playing if verdict.is_some() => {
            return Err(Inconsistent("game is marked playing but is already decided"));
        }
        GameStatus::Finished if state.selected.is_some() => {
            return Err(Inconsistent("finished game still has a selection"));
        }
        GameStatus::Finished if verdict != state.result => {
            return Err(Inconsistent("recorded result does not follow from the position"));
        }
        _ => {}
    }

    state.legal_moves = match state.selected {
        Some(pos) if state.must_continue_capture => moves_for_piece(&state.board, pos),
        Some(pos) => selection_moves(&state.board, pos, state.current_player),
        None => Vec::new(),
    };

    Ok(state)
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
