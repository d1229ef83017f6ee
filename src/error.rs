use crate::types::{Color, Position};

/// Why a `select` call was refused. The game state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSelection {
    GameFinished,
    EmptySquare(Position),
    OpponentPiece(Position),
    ChainInProgress { chain_piece: Position },
}

impl std::error::Error for InvalidSelection {}

impl std::fmt::Display for InvalidSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidSelection::GameFinished => write!(f, "Game is over"),
            InvalidSelection::EmptySquare(pos) => write!(f, "No piece at {}", pos),
            InvalidSelection::OpponentPiece(pos) => {
                write!(f, "The piece at {} belongs to the opponent", pos)
            }
            InvalidSelection::ChainInProgress { chain_piece } => write!(
                f,
                "A capture chain is in progress, only the piece at {} may be selected",
                chain_piece
            ),
        }
    }
}

/// The error type for `commit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitError {
    NoSelection,
    GameFinished,
    IllegalMove { to: Position },
}

impl CommitError {
    /// `false` for `IllegalMove`, `true` for the invalid-state variants.
    pub fn is_invalid_state(&self) -> bool {
        !matches!(self, CommitError::IllegalMove { .. })
    }
}

impl std::error::Error for CommitError {}

impl std::fmt::Display for CommitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitError::NoSelection => write!(f, "No piece selected"),
            CommitError::GameFinished => write!(f, "Game is over"),
            CommitError::IllegalMove { to } => write!(f, "Illegal move to {}", to),
        }
    }
}

/// Structural problems with a board, found while decoding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    OffBoard(Position),
    LightSquare(Position),
    SquareTaken(Position),
    DuplicateId(u8),
    TooManyPieces(Color),
    UncrownedOnKingRow(Position),
}

impl std::error::Error for BoardError {}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::OffBoard(pos) => write!(f, "Square {} is off the board", pos),
            BoardError::LightSquare(pos) => write!(f, "Piece on light square {}", pos),
            BoardError::SquareTaken(pos) => write!(f, "Two pieces share square {}", pos),
            BoardError::DuplicateId(id) => write!(f, "Piece id {} is used twice", id),
            BoardError::TooManyPieces(color) => write!(f, "More than 12 {} pieces", color),
            BoardError::UncrownedOnKingRow(pos) => {
                write!(f, "Man at {} stands on its promotion row", pos)
            }
        }
    }
}

/// The error type for `import_snapshot`. The current state is never touched.
#[derive(Debug)]
pub enum MalformedImport {
    TooShort { len: usize },
    BadMagic,
    UnsupportedVersion(u32),
    LengthMismatch { declared: usize, actual: usize },
    ChecksumMismatch { expected: u32, actual: u32 },
    Json(serde_json::Error),
    Inconsistent(&'static str),
}

impl std::error::Error for MalformedImport {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MalformedImport::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for MalformedImport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedImport::TooShort { len } => {
                write!(f, "snapshot too short: got {} bytes", len)
            }
            MalformedImport::BadMagic => write!(f, "invalid snapshot magic (expected CKRS)"),
            MalformedImport::UnsupportedVersion(version) => {
                write!(f, "unsupported snapshot version: {}", version)
            }
            MalformedImport::LengthMismatch { declared, actual } => write!(
                f,
                "snapshot payload length mismatch: header says {}, got {}",
                declared, actual
            ),
            MalformedImport::ChecksumMismatch { expected, actual } => write!(
                f,
                "CRC32 mismatch: expected {:#010x}, got {:#010x}",
                expected, actual
            ),
            MalformedImport::Json(err) => {
                write!(f, "snapshot payload is not a game state: {}", err)
            }
            MalformedImport::Inconsistent(reason) => {
                write!(f, "inconsistent snapshot: {}", reason)
            }
        }
    }
}

impl From<serde_json::Error> for MalformedImport {
    fn from(err: serde_json::Error) -> Self {
        MalformedImport::Json(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroDrawLimit,
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroDrawLimit => {
                write!(f, "no_capture_draw_limit must be at least 1")
            }
        }
    }
}
