use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Color;

/// Moves without a capture after which the game is drawn.
pub const NO_CAPTURE_DRAW_LIMIT: u32 = 50;

/// Tunable parts of the ruleset. Every field has a default, so a host may
/// pass a partial object (or nothing at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub no_capture_draw_limit: u32,
    pub first_player: Color,
}

impl RulesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.no_capture_draw_limit == 0 {
            return Err(ConfigError::ZeroDrawLimit);
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            no_capture_draw_limit: NO_CAPTURE_DRAW_LIMIT,
            first_player: Color::Red,
        }
    }
}
