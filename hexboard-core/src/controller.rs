//! Host-side board controller
//!
//! Owns a rules engine, an interaction session and the board configuration.
//! Moves emitted by the session are applied to the engine immediately.

use crate::config::BoardConfig;
use crate::engine::RulesEngine;
use crate::geometry::Vec2;
use crate::layout::{layout, LabelEmphasis};
use crate::session::{Cursor, Event, Input, Session, SessionError};

/// An interactive board bound to a rules engine
#[derive(Debug)]
pub struct Hexboard<E> {
    engine: E,
    session: Session,
    config: BoardConfig,
}

impl<E: RulesEngine> Hexboard<E> {
    pub fn new(engine: E, config: BoardConfig) -> Self {
        Self {
            engine,
            session: Session::new(),
            config,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Configuration changes take effect on the next input
    pub fn config_mut(&mut self) -> &mut BoardConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: BoardConfig) {
        self.config = config;
    }

    /// Swap in a new position; selection, drag and promotion are dropped
    pub fn replace_engine(&mut self, engine: E) -> E {
        self.session.reset();
        std::mem::replace(&mut self.engine, engine)
    }

    pub fn cursor(&self) -> Cursor {
        self.session.cursor(&self.engine, &self.config)
    }

    /// Emphasis of every label, in layout order
    pub fn label_emphasis(&self) -> Vec<LabelEmphasis> {
        let hovered = self.session.hovered_coord();
        layout()
            .labels()
            .iter()
            .map(|label| label.emphasis(hovered))
            .collect()
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Run one input through the session and apply any resulting move
    pub fn dispatch(&mut self, input: Input) -> Result<Vec<Event>, SessionError> {
        let mut events = self.session.handle(&self.engine, &self.config, input)?;

        let mut rejected = Vec::new();
        for event in &events {
            let Event::Move(mv) = event else {
                continue;
            };
            match self.engine.apply_move(mv) {
                Ok(()) => tracing::debug!("Applied move {}", mv),
                Err(reason) => {
                    tracing::warn!("Rules engine rejected move {}: {}", mv, reason);
                    rejected.push(Event::MoveRejected { mv: *mv, reason });
                }
            }
        }
        events.extend(rejected);
        Ok(events)
    }

    pub fn pointer_enter(&mut self, index: usize) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::PointerEnter(index))
    }

    pub fn pointer_leave(&mut self, index: usize) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::PointerLeave(index))
    }

    pub fn pointer_down(&mut self, index: usize, pointer: Vec2) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::PointerDown { index, pointer })
    }

    pub fn pointer_move(&mut self, pointer: Vec2) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::PointerMove(pointer))
    }

    /// Release over a cell, or `None` off the board
    pub fn pointer_up(&mut self, over: Option<usize>) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::PointerUp(over))
    }

    /// Release at a render-space point, hit-tested against the displayed board
    pub fn pointer_up_at(&mut self, render_point: Vec2) -> Result<Vec<Event>, SessionError> {
        let over = layout().hit_test(render_point, self.config.flipped);
        self.pointer_up(over)
    }

    pub fn click(&mut self, index: usize) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::Click(index))
    }

    pub fn cancel_key(&mut self) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::CancelKey)
    }

    pub fn promote(&mut self, kind: char) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::Promote(kind))
    }

    pub fn cancel_promotion(&mut self) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::CancelPromotion)
    }

    /// Select a cell from the host side; targets come from the engine
    pub fn select(&mut self, index: usize) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::Select(Some(index)))
    }

    pub fn clear_selection(&mut self) -> Result<Vec<Event>, SessionError> {
        self.dispatch(Input::Select(None))
    }
}
