//! Pointer interaction state machine
//!
//! Turns hover, click, drag and keyboard input into selection, target
//! highlighting, promotion prompts and move requests. Legality is always
//! delegated to the [`RulesEngine`]; the session only remembers what the
//! engine said about the selected cell.
//!
//! Each input is handled by one call to [`Session::handle`], which runs the
//! transition to completion and returns the emitted events afterwards.

use crate::config::BoardConfig;
use crate::coord::{Coord, CELL_COUNT};
use crate::engine::{EngineError, MoveRequest, RulesEngine};
use crate::geometry::Vec2;
use crate::pieces::{Promotion, PromotionError};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// TYPES
// ============================================================================

/// Input events accepted by the session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Input {
    PointerEnter(usize),
    PointerLeave(usize),
    PointerDown { index: usize, pointer: Vec2 },
    PointerMove(Vec2),
    /// Pointer released over a cell, or off the board
    PointerUp(Option<usize>),
    Click(usize),
    /// Escape
    CancelKey,
    /// Promotion choice as a piece letter (`q`, `r`, `b`, `n`)
    Promote(char),
    CancelPromotion,
    /// Host sets or clears the selection directly
    Select(Option<usize>),
}

/// Events emitted to the host
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A move for the rules engine
    Move(MoveRequest),
    /// The host should ask the user for a promotion piece
    PromotionRequested { from: usize, to: usize },
    /// A cell was clicked on an active board
    Clicked(usize),
    SelectionChanged(Option<usize>),
    /// The engine refused a move the board emitted
    MoveRejected { mv: MoveRequest, reason: EngineError },
}

/// A selected cell and the engine's legal targets for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub targets: FxHashSet<usize>,
}

/// An in-progress drag
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
    pub from: usize,
    pub pointer: Vec2,
    pub targets: FxHashSet<usize>,
}

/// A move waiting for its promotion piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPromotion {
    pub from: usize,
    pub to: usize,
}

/// Selection, drag and promotion state
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Selected(Selection),
    /// `selection` is restored if the drop does not produce a move
    Dragging {
        drag: DragState,
        selection: Option<Selection>,
    },
    /// `selection` is restored if the promotion is canceled
    AwaitingPromotion {
        promotion: PendingPromotion,
        selection: Selection,
    },
}

/// Pointer cursor affordance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    Default,
    /// Piece can be selected but not dragged
    Pointer,
    Grab,
    Grabbing,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidPromotion(#[from] PromotionError),

    #[error("no promotion is pending")]
    NoPendingPromotion,
}

// ============================================================================
// SESSION
// ============================================================================

/// Interaction session for one mounted board
#[derive(Clone, Debug, Default)]
pub struct Session {
    hovered: Option<usize>,
    state: Interaction,
}

fn on_board(index: usize) -> bool {
    index < CELL_COUNT
}

fn notation(index: usize) -> String {
    Coord::from_index(index).map_or_else(|| format!("#{index}"), |c| c.to_string())
}

/// Fetch legal targets; engine failures count as "no targets"
fn targets_for<E: RulesEngine + ?Sized>(engine: &E, index: usize) -> FxHashSet<usize> {
    match engine.legal_targets(index) {
        Ok(targets) => targets.into_iter().filter(|&i| on_board(i)).collect(),
        Err(e) => {
            tracing::warn!("Failed to fetch legal targets for {}: {}", notation(index), e);
            FxHashSet::default()
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    pub fn hovered_coord(&self) -> Option<Coord> {
        self.hovered.and_then(Coord::from_index)
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.state {
            Interaction::Idle => None,
            Interaction::Selected(s) => Some(s.index),
            Interaction::Dragging { selection, .. } => selection.as_ref().map(|s| s.index),
            Interaction::AwaitingPromotion { selection, .. } => Some(selection.index),
        }
    }

    /// Legal targets of the selected cell.
    ///
    /// While dragging this is still the selection's set; the dragged piece's
    /// targets are on [`DragState`].
    pub fn targets(&self) -> Option<&FxHashSet<usize>> {
        match &self.state {
            Interaction::Selected(s) => Some(&s.targets),
            Interaction::Dragging { selection, .. } => selection.as_ref().map(|s| &s.targets),
            Interaction::Idle | Interaction::AwaitingPromotion { .. } => None,
        }
    }

    pub fn is_target(&self, index: usize) -> bool {
        self.targets().is_some_and(|t| t.contains(&index))
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        match &self.state {
            Interaction::Dragging { drag, .. } => Some(drag),
            _ => None,
        }
    }

    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        match &self.state {
            Interaction::AwaitingPromotion { promotion, .. } => Some(*promotion),
            _ => None,
        }
    }

    /// Cursor over the hovered cell
    pub fn cursor<E: RulesEngine + ?Sized>(&self, engine: &E, config: &BoardConfig) -> Cursor {
        if !config.active {
            return Cursor::Default;
        }
        if self.drag_state().is_some() {
            return Cursor::Grabbing;
        }
        match self.hovered.and_then(|i| engine.occupant(i)) {
            None => Cursor::Default,
            Some(piece) if config.playing.allows(piece.color) => Cursor::Grab,
            Some(_) => Cursor::Pointer,
        }
    }

    /// Drop selection, drag and pending promotion (the position was replaced)
    pub fn reset(&mut self) {
        self.state = Interaction::Idle;
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    /// Handle one input event to completion
    pub fn handle<E: RulesEngine + ?Sized>(
        &mut self,
        engine: &E,
        config: &BoardConfig,
        input: Input,
    ) -> Result<Vec<Event>, SessionError> {
        let before = self.selected_index();
        let mut events = Vec::new();

        match input {
            Input::PointerEnter(index) => self.pointer_enter(config, index),
            Input::PointerLeave(index) => self.pointer_leave(config, index),
            Input::PointerDown { index, pointer } => self.pointer_down(engine, config, index, pointer),
            Input::PointerMove(pointer) => self.pointer_move(pointer),
            Input::PointerUp(over) => self.pointer_up(engine, config, over, &mut events),
            Input::Click(index) => self.click(engine, config, index, &mut events),
            Input::CancelKey => self.cancel_key(),
            Input::Promote(kind) => self.promote(kind, &mut events)?,
            Input::CancelPromotion => self.cancel_promotion(),
            Input::Select(index) => self.host_select(engine, index),
        }

        let after = self.selected_index();
        if before != after {
            events.push(Event::SelectionChanged(after));
        }
        Ok(events)
    }

    fn pointer_enter(&mut self, config: &BoardConfig, index: usize) {
        if config.active && on_board(index) {
            self.hovered = Some(index);
        }
    }

    fn pointer_leave(&mut self, config: &BoardConfig, index: usize) {
        if config.active && self.hovered == Some(index) {
            self.hovered = None;
        }
    }

    fn click<E: RulesEngine + ?Sized>(
        &mut self,
        engine: &E,
        config: &BoardConfig,
        index: usize,
        events: &mut Vec<Event>,
    ) {
        if !config.active || !on_board(index) {
            return;
        }
        events.push(Event::Clicked(index));

        match std::mem::take(&mut self.state) {
            Interaction::AwaitingPromotion { promotion, selection } => {
                tracing::debug!(
                    "Promotion {}{} canceled by click",
                    notation(promotion.from),
                    notation(promotion.to)
                );
                self.state = Interaction::Selected(selection);
            }
            // clicks are not expected mid-drag; the drop decides
            dragging @ Interaction::Dragging { .. } => self.state = dragging,
            Interaction::Selected(selection) => {
                if selection.targets.contains(&index)
                    && self.move_allowed(engine, config, selection.index, index)
                {
                    self.complete_move(engine, selection, index, events);
                } else {
                    self.select_or_clear(engine, index);
                }
            }
            Interaction::Idle => self.select_or_clear(engine, index),
        }
    }

    fn pointer_down<E: RulesEngine + ?Sized>(
        &mut self,
        engine: &E,
        config: &BoardConfig,
        index: usize,
        pointer: Vec2,
    ) {
        if !config.active || !on_board(index) {
            return;
        }
        if matches!(
            self.state,
            Interaction::Dragging { .. } | Interaction::AwaitingPromotion { .. }
        ) {
            return;
        }
        // pressing a target of the selection is the start of a click-move
        if self.is_target(index) {
            return;
        }
        let Some(piece) = engine.occupant(index) else {
            return;
        };
        if !config.playing.allows(piece.color) {
            return;
        }

        if config.autoselect {
            self.select(engine, index);
        }

        let selection = match std::mem::take(&mut self.state) {
            Interaction::Selected(s) => Some(s),
            _ => None,
        };
        let targets = match &selection {
            Some(s) if s.index == index => s.targets.clone(),
            _ => targets_for(engine, index),
        };

        tracing::debug!("Dragging from {}", notation(index));
        self.state = Interaction::Dragging {
            drag: DragState {
                from: index,
                pointer,
                targets,
            },
            selection,
        };
    }

    fn pointer_move(&mut self, pointer: Vec2) {
        if let Interaction::Dragging { drag, .. } = &mut self.state {
            drag.pointer = pointer;
        }
    }

    fn pointer_up<E: RulesEngine + ?Sized>(
        &mut self,
        engine: &E,
        config: &BoardConfig,
        over: Option<usize>,
        events: &mut Vec<Event>,
    ) {
        let Interaction::Dragging { drag, selection } = std::mem::take(&mut self.state) else {
            return;
        };
        let DragState { from, targets, .. } = drag;

        let drop = over.filter(|&to| {
            config.active
                && on_board(to)
                && targets.contains(&to)
                && self.move_allowed(engine, config, from, to)
        });

        match drop {
            Some(to) => {
                let selection = Selection {
                    index: from,
                    targets,
                };
                self.complete_move(engine, selection, to, events);
            }
            None => {
                tracing::debug!("Drag from {} ended without a move", notation(from));
                self.state = selection.map_or(Interaction::Idle, Interaction::Selected);
            }
        }
    }

    /// Backs out of a pending promotion, otherwise clears the selection
    fn cancel_key(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            Interaction::AwaitingPromotion { selection, .. } => Interaction::Selected(selection),
            Interaction::Idle | Interaction::Selected(_) | Interaction::Dragging { .. } => {
                Interaction::Idle
            }
        };
    }

    /// Host-driven selection; replaces any drag or pending promotion.
    /// Empty or off-board cells clear the selection.
    fn host_select<E: RulesEngine + ?Sized>(&mut self, engine: &E, index: Option<usize>) {
        match index.filter(|&i| on_board(i)) {
            Some(index) => self.select_or_clear(engine, index),
            None => self.state = Interaction::Idle,
        }
    }

    fn promote(&mut self, kind: char, events: &mut Vec<Event>) -> Result<(), SessionError> {
        let Interaction::AwaitingPromotion { promotion, .. } = &self.state else {
            return Err(SessionError::NoPendingPromotion);
        };
        let choice = Promotion::try_from(kind)?;
        let mv = MoveRequest::new(promotion.from, promotion.to).with_promotion(choice);

        tracing::debug!("Promoting: {}", mv);
        self.state = Interaction::Idle;
        events.push(Event::Move(mv));
        Ok(())
    }

    fn cancel_promotion(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            Interaction::AwaitingPromotion { selection, .. } => Interaction::Selected(selection),
            other => other,
        };
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn select<E: RulesEngine + ?Sized>(&mut self, engine: &E, index: usize) {
        let targets = targets_for(engine, index);
        tracing::debug!("Selected {} with {} targets", notation(index), targets.len());
        self.state = Interaction::Selected(Selection { index, targets });
    }

    fn select_or_clear<E: RulesEngine + ?Sized>(&mut self, engine: &E, index: usize) {
        if engine.occupant(index).is_some() {
            self.select(engine, index);
        } else {
            self.state = Interaction::Idle;
        }
    }

    /// Turn and ownership checks, then a fresh legality check against the engine
    fn move_allowed<E: RulesEngine + ?Sized>(
        &self,
        engine: &E,
        config: &BoardConfig,
        from: usize,
        to: usize,
    ) -> bool {
        let Some(piece) = engine.occupant(from) else {
            return false;
        };
        if !config.playing.allows(piece.color) {
            tracing::debug!("Move from {} blocked: {:?} is not playable", notation(from), piece.color);
            return false;
        }
        if !config.ignore_turn && piece.color != engine.turn() {
            tracing::debug!("Move from {} blocked: not {:?}'s turn", notation(from), piece.color);
            return false;
        }
        targets_for(engine, from).contains(&to)
    }

    fn complete_move<E: RulesEngine + ?Sized>(
        &mut self,
        engine: &E,
        selection: Selection,
        to: usize,
        events: &mut Vec<Event>,
    ) {
        let from = selection.index;
        if engine.requires_promotion(from, to) {
            tracing::debug!("Awaiting promotion for {}{}", notation(from), notation(to));
            self.state = Interaction::AwaitingPromotion {
                promotion: PendingPromotion { from, to },
                selection,
            };
            events.push(Event::PromotionRequested { from, to });
        } else {
            let mv = MoveRequest::new(from, to);
            tracing::debug!("Move: {}", mv);
            self.state = Interaction::Idle;
            events.push(Event::Move(mv));
        }
    }
}
