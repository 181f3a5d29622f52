//! Board configuration
//!
//! The session reads these flags on every transition; changing them never
//! alters selection, drag or promotion state by itself.

use crate::pieces::Color;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which colors the local user plays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PlayingRepr", into = "PlayingRepr")]
pub enum Playing {
    /// Spectating: pieces can be inspected but never dragged or moved
    #[default]
    None,
    /// Both colors (analysis board, hot seat)
    Both,
    /// A single color
    Only(Color),
}

impl Playing {
    /// Whether pieces of `color` belong to the user
    pub fn allows(self, color: Color) -> bool {
        match self {
            Playing::None => false,
            Playing::Both => true,
            Playing::Only(c) => c == color,
        }
    }
}

/// `true`, `false`, `"w"` or `"b"`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PlayingRepr {
    Flag(bool),
    Color(Color),
}

impl From<PlayingRepr> for Playing {
    fn from(repr: PlayingRepr) -> Self {
        match repr {
            PlayingRepr::Flag(false) => Playing::None,
            PlayingRepr::Flag(true) => Playing::Both,
            PlayingRepr::Color(c) => Playing::Only(c),
        }
    }
}

impl From<Playing> for PlayingRepr {
    fn from(playing: Playing) -> Self {
        match playing {
            Playing::None => PlayingRepr::Flag(false),
            Playing::Both => PlayingRepr::Flag(true),
            Playing::Only(c) => PlayingRepr::Color(c),
        }
    }
}

/// Interaction flags supplied by the host
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Accept hover, click and drag input
    pub active: bool,
    /// Colors the user may drag and move
    pub playing: Playing,
    /// Pressing a piece selects it before dragging
    pub autoselect: bool,
    /// Allow moving pieces out of turn
    pub ignore_turn: bool,
    /// Render and hit-test the mirrored board
    pub flipped: bool,
}

impl BoardConfig {
    /// Active board where the user plays `playing`, with autoselect on
    pub fn playing(playing: Playing) -> Self {
        Self {
            active: true,
            playing,
            autoselect: true,
            ..Default::default()
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_playing(mut self, playing: Playing) -> Self {
        self.playing = playing;
        self
    }

    pub fn with_autoselect(mut self, autoselect: bool) -> Self {
        self.autoselect = autoselect;
        self
    }

    pub fn with_ignore_turn(mut self, ignore_turn: bool) -> Self {
        self.ignore_turn = ignore_turn;
        self
    }

    pub fn with_flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid board config {}", path.display()))
    }
}
