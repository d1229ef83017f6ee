use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: u8 = 8;

/// A board coordinate. Values built through [`Position::new`], [`Position::offset`]
/// or deserialization are always on the board; a hand-built literal may not be,
/// and the board checks [`Position::is_on_board`] before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Returns `None` when `row` or `col` is outside the board.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Steps `(dr, dc)` squares away, or `None` when that leaves the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = i16::from(self.row) + i16::from(dr);
        let col = i16::from(self.col) + i16::from(dc);
        let row = u8::try_from(row).ok()?;
        let col = u8::try_from(col).ok()?;
        Self::new(row, col)
    }

    pub fn is_on_board(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Playable squares are the dark ones.
    pub fn is_dark(self) -> bool {
        (self.row ^ self.col) & 1 == 1
    }

    pub(crate) fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Deserialize)]
struct RawPosition {
    row: u8,
    col: u8,
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::new(raw.row, raw.col)
            .ok_or_else(|| format!("position ({}, {}) is off the board", raw.row, raw.col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Starts on rows 5..=7 and moves toward row 0.
    Red,
    /// Starts on rows 0..=2 and moves toward row 7.
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// Row direction of a man's forward step.
    pub fn forward(self) -> i8 {
        match self {
            Self::Red => -1,
            Self::Black => 1,
        }
    }

    /// The far row on which a man of this color is crowned.
    pub fn promotion_row(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Black => BOARD_SIZE - 1,
        }
    }

    /// The result recorded when this side wins.
    pub fn wins(self) -> GameResult {
        match self {
            Self::Red => GameResult::RedWins,
            Self::Black => GameResult::BlackWins,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Man,
    King,
}

/// A piece record. `id` is assigned once at setup and survives every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: u8,
    pub color: Color,
    pub rank: Rank,
    pub position: Position,
}

impl Piece {
    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }
}

/// One committed unit of play.
///
/// A multi-jump chain is a single move: `from` is where the chain starts,
/// `to` is the final landing square and `captured` lists every jumped
/// square in jump order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub captured: Vec<Position>,
    pub is_capture: bool,
    pub promotes: bool,
}

impl Move {
    pub fn step(from: Position, to: Position, promotes: bool) -> Self {
        Self {
            from,
            to,
            captured: Vec::new(),
            is_capture: false,
            promotes,
        }
    }

    pub fn jump(from: Position, to: Position, captured: Vec<Position>, promotes: bool) -> Self {
        debug_assert!(!captured.is_empty(), "a jump must capture something");
        Self {
            from,
            to,
            captured,
            is_capture: true,
            promotes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameResult {
    RedWins,
    BlackWins,
    Draw,
}

/// Where the state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    Selected,
    CaptureChain,
    Finished,
}

/// Result of `commit` handed across the wasm boundary.
/// Contract:
/// - `ok == true` implies `error == None`.
/// - `ok == false` carries a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for CommitResponse {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => Self {
                ok: true,
                error: None,
            },
            Err(err) => Self {
                ok: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Piece totals for HUDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceCounts {
    pub red: u8,
    pub black: u8,
}
