//! Rules-engine contract
//!
//! The board never decides legality itself. Occupancy, legal targets, turn
//! and the promotion rule all come from an injected [`RulesEngine`].

use crate::coord::Coord;
use crate::pieces::{Color, Piece, Promotion};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move request emitted by the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
}

impl MoveRequest {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = Some(promotion);
        self
    }
}

/// Formats as `f10f11q`; indices off the board fall back to `#n`
impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in [self.from, self.to] {
            match Coord::from_index(index) {
                Some(c) => write!(f, "{c}")?,
                None => write!(f, "#{index}")?,
            }
        }
        if let Some(p) = self.promotion {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

/// Errors reported by a rules engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("illegal move: {0}")]
    IllegalMove(MoveRequest),

    #[error("no piece at index {0}")]
    EmptySource(usize),

    #[error("rules engine unavailable: {0}")]
    Unavailable(String),
}

/// Rules engine consumed by the board.
///
/// Calls are synchronous. Indices follow the canonical 0..=90 scheme of
/// [`Coord::index`].
pub trait RulesEngine {
    /// Piece occupying a cell, if any
    fn occupant(&self, index: usize) -> Option<Piece>;

    /// Destinations reachable from `index` under the current rules
    fn legal_targets(&self, index: usize) -> Result<FxHashSet<usize>, EngineError>;

    /// Color to move
    fn turn(&self) -> Color;

    /// Whether moving `from` -> `to` needs a promotion choice
    fn requires_promotion(&self, from: usize, to: usize) -> bool;

    /// Apply a move to the position
    fn apply_move(&mut self, mv: &MoveRequest) -> Result<(), EngineError>;
}
