use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod ai;
pub mod apply;
#[cfg(test)]
mod arbitrary;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod movegen;
pub mod rules;
pub mod snapshot;
pub mod types;

use crate::ai::MaterialSelector;
use crate::config::RulesConfig;
use crate::game::GameInstance;
use crate::types::{Color, CommitResponse, Position};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Game handle exported to JS. Every presentation surface drives the same
/// engine through it; the automated opponent is the greedy material selector.
#[wasm_bindgen]
pub struct CheckersGame {
    inner: GameInstance,
}

#[wasm_bindgen]
impl CheckersGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: GameInstance::new(Box::new(MaterialSelector)),
        }
    }

    /// Accepts a partial `RulesConfig` object; `undefined` or `null` means defaults.
    pub fn with_config(config: JsValue) -> Result<CheckersGame, JsValue> {
        let config: RulesConfig = if config.is_undefined() || config.is_null() {
            RulesConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let inner = GameInstance::with_config(config, Box::new(MaterialSelector))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self { inner })
    }

    pub fn select(&mut self, row: u8, col: u8) -> bool {
        Position::new(row, col).is_some_and(|pos| self.inner.select(pos).is_ok())
    }

    pub fn deselect(&mut self) {
        self.inner.deselect();
    }

    /// Returns `{ ok, error? }`.
    pub fn commit(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let response = match Position::new(row, col) {
            Some(pos) => CommitResponse::from(self.inner.commit(pos)),
            None => CommitResponse {
                ok: false,
                error: Some("row/col out of range".to_string()),
            },
        };
        to_js(&response)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.state())
    }

    pub fn phase(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.phase())
    }

    pub fn piece_counts(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.piece_counts())
    }

    /// Board as 64 cells: 0=empty, 1=red man, 2=black man, 3=red king, 4=black king.
    pub fn board_cells(&self) -> Vec<u8> {
        self.inner.state().board.to_array().to_vec()
    }

    pub fn legal_moves_for_selection(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.legal_moves_for_selection())
    }

    /// `color` is `"red"` or `"black"`.
    pub fn legal_moves(&self, color: JsValue) -> Result<JsValue, JsValue> {
        let color: Color = serde_wasm_bindgen::from_value(color)?;
        to_js(&self.inner.legal_moves(color))
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn export_snapshot(&self) -> Result<Vec<u8>, JsValue> {
        self.inner
            .export_snapshot()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    pub fn import_snapshot(&mut self, data: &[u8]) -> bool {
        self.inner.import_snapshot(data).is_ok()
    }

    /// Plays the side to move with the built-in opponent and returns the moves made.
    pub fn do_ai_move(&mut self) -> Result<JsValue, JsValue> {
        let played = self
            .inner
            .do_ai_move()
            .map_err(|err| JsValue::from_str(&err))?;
        to_js(&played)
    }
}

impl Default for CheckersGame {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}
