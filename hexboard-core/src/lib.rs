//! HEXBOARD Core - Hexagonal chess board geometry and interaction
//!
//! This crate provides everything a host needs to draw and drive a
//! 91-cell hexagonal chess board:
//! - Geometry kernel (hexagons, pivots, reflection)
//! - Cell notation and the canonical 0..=90 index
//! - Precomputed layout: cell paths, labels and the board perimeter
//! - Projection into the render box and SVG path serialization
//! - An interaction session that turns pointer input into move requests,
//!   delegating legality to a [`RulesEngine`]

pub mod geometry;
pub mod coord;
pub mod pieces;
pub mod render;
pub mod layout;
pub mod engine;
pub mod config;
pub mod session;
pub mod controller;

// Re-exports for convenient access
pub use geometry::{Vec2, Hexagon, SIDE_LENGTH};
pub use coord::{Coord, NotationError, CELL_COUNT, FILES};
pub use pieces::{Color, Piece, PieceKind, Promotion, PromotionError};
pub use render::{project, serialize, VIEWBOX};
pub use layout::{layout, Cell, Label, LabelEmphasis, Layout};
pub use engine::{EngineError, MoveRequest, RulesEngine};
pub use config::{BoardConfig, Playing};
pub use session::{Cursor, Event, Input, Interaction, Session, SessionError};
pub use controller::Hexboard;
