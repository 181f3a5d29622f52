//! Integration tests for board interaction
//!
//! Drives the controller end to end against a scripted rules engine:
//! click and drag moves, promotion, turn gating, engine failures and
//! randomized input sequences.

use hexboard_core::{
    coord::{index, Coord, CELL_COUNT},
    layout, project, BoardConfig, Color, Cursor, EngineError, Event, Hexboard, Input,
    Interaction, LabelEmphasis, MoveRequest, Piece, PieceKind, Playing, Promotion,
    RulesEngine, Session, SessionError,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::{FxHashMap, FxHashSet};

// ============================================================================
// TEST FIXTURES
// ============================================================================

const INITIAL: &str = "b/qbk/n1b1n/r5r/ppppppppp/11/5P5/4P1P4/3P1B1P3/2P2B2P2/1PRNQBKNRP1";
const PROMOTION: &str = "1/1P1/5/7/9/11/11/11/11/11/11";

/// Rules engine with a fixed placement and scripted target sets.
///
/// Without a script every piece may step to any edge-adjacent cell that is
/// empty or holds an opponent piece.
#[derive(Clone, Debug)]
struct ScriptedEngine {
    occupants: FxHashMap<usize, Piece>,
    script: Option<FxHashMap<usize, FxHashSet<usize>>>,
    turn: Color,
    fail_targets: bool,
    reject_moves: bool,
    applied: Vec<MoveRequest>,
}

impl ScriptedEngine {
    /// Parse a placement: ranks 11 down to 1 separated by `/`, digits for
    /// runs of empty cells, uppercase for white
    fn from_placement(placement: &str) -> Self {
        let mut occupants = FxHashMap::default();
        let mut next = 0;
        for rank in placement.split('/') {
            let mut empty = 0;
            for c in rank.chars() {
                if let Some(d) = c.to_digit(10) {
                    empty = empty * 10 + d as usize;
                    continue;
                }
                next += std::mem::take(&mut empty);
                occupants.insert(next, Piece::from_char(c).unwrap());
                next += 1;
            }
            next += empty;
        }
        assert_eq!(next, CELL_COUNT, "placement must cover the board");

        Self {
            occupants,
            script: None,
            turn: Color::White,
            fail_targets: false,
            reject_moves: false,
            applied: Vec::new(),
        }
    }

    fn initial() -> Self {
        Self::from_placement(INITIAL)
            .with_targets("f5", &["f6"])
            .with_targets("f7", &["f6"])
    }

    fn with_targets(mut self, from: &str, targets: &[&str]) -> Self {
        let set = targets.iter().map(|t| index(t).unwrap()).collect();
        self.script
            .get_or_insert_with(FxHashMap::default)
            .insert(index(from).unwrap(), set);
        self
    }

    fn with_turn(mut self, turn: Color) -> Self {
        self.turn = turn;
        self
    }
}

/// Last cell of a file in the pawn's direction of travel
fn is_promotion_cell(color: Color, coord: Coord) -> bool {
    match color {
        Color::White => i32::from(coord.rank) + coord.file_offset().abs() == 11,
        Color::Black => coord.rank == 1,
    }
}

impl RulesEngine for ScriptedEngine {
    fn occupant(&self, index: usize) -> Option<Piece> {
        self.occupants.get(&index).copied()
    }

    fn legal_targets(&self, index: usize) -> Result<FxHashSet<usize>, EngineError> {
        if self.fail_targets {
            return Err(EngineError::Unavailable("scripted failure".to_string()));
        }
        let Some(piece) = self.occupant(index) else {
            return Err(EngineError::EmptySource(index));
        };
        match &self.script {
            Some(script) => Ok(script.get(&index).cloned().unwrap_or_default()),
            None => Ok(layout()
                .neighbors(index)
                .map(|cell| cell.index)
                .filter(|i| self.occupant(*i).map_or(true, |p| p.color != piece.color))
                .collect()),
        }
    }

    fn turn(&self) -> Color {
        self.turn
    }

    fn requires_promotion(&self, from: usize, to: usize) -> bool {
        match (self.occupant(from), Coord::from_index(to)) {
            (Some(piece), Some(coord)) => {
                piece.kind == PieceKind::Pawn && is_promotion_cell(piece.color, coord)
            }
            _ => false,
        }
    }

    fn apply_move(&mut self, mv: &MoveRequest) -> Result<(), EngineError> {
        if self.reject_moves {
            return Err(EngineError::Unavailable("scripted rejection".to_string()));
        }
        if !self.legal_targets(mv.from)?.contains(&mv.to) {
            return Err(EngineError::IllegalMove(*mv));
        }
        let mut piece = self
            .occupants
            .remove(&mv.from)
            .ok_or(EngineError::EmptySource(mv.from))?;
        if let Some(promotion) = mv.promotion {
            piece.kind = promotion.kind();
        }
        self.occupants.insert(mv.to, piece);
        if let Some(script) = &mut self.script {
            script.remove(&mv.from);
        }
        self.turn = self.turn.opponent();
        self.applied.push(*mv);
        Ok(())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn i(notation: &str) -> usize {
    index(notation).unwrap()
}

fn moves(events: &[Event]) -> Vec<MoveRequest> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Move(mv) => Some(*mv),
            _ => None,
        })
        .collect()
}

fn board(engine: ScriptedEngine) -> Hexboard<ScriptedEngine> {
    Hexboard::new(engine, BoardConfig::playing(Playing::Both))
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_click_pawn_then_target() {
    init_tracing();
    let mut board = board(ScriptedEngine::initial());

    let events = board.click(i("f5")).unwrap();
    assert!(moves(&events).is_empty());
    assert_eq!(board.session().selected_index(), Some(i("f5")));

    let events = board.click(i("f6")).unwrap();
    assert_eq!(moves(&events), vec![MoveRequest::new(i("f5"), i("f6"))]);
    assert_eq!(*board.session().state(), Interaction::Idle);
    assert_eq!(board.engine().applied.len(), 1);
    assert_eq!(
        board.engine().occupant(i("f6")),
        Some(Piece::new(Color::White, PieceKind::Pawn))
    );
}

#[test]
fn test_drag_onto_promotion_rank() {
    init_tracing();
    let engine = ScriptedEngine::from_placement(PROMOTION).with_targets("f10", &["f11"]);
    let mut board = board(engine);
    let (f10, f11) = (i("f10"), i("f11"));

    board.pointer_down(f10, [10.0, 5.0]).unwrap();
    assert_eq!(board.cursor(), Cursor::Grabbing);
    board.pointer_move([11.8, 1.0]).unwrap();

    let events = board.pointer_up(Some(f11)).unwrap();
    assert!(events.contains(&Event::PromotionRequested { from: f10, to: f11 }));
    assert!(moves(&events).is_empty());
    assert!(board.session().drag_state().is_none());
    assert_eq!(board.session().selected_index(), Some(f10));

    let events = board.promote('q').unwrap();
    assert_eq!(
        moves(&events),
        vec![MoveRequest::new(f10, f11).with_promotion(Promotion::Queen)]
    );
    assert_eq!(
        board.engine().occupant(f11),
        Some(Piece::new(Color::White, PieceKind::Queen))
    );
    assert_eq!(*board.session().state(), Interaction::Idle);
}

#[test]
fn test_turn_blocks_opponent_move() {
    init_tracing();
    let mut board = board(ScriptedEngine::initial());

    // black pawn on white's turn: inspectable, target shown, move blocked
    board.click(i("f7")).unwrap();
    assert!(board.session().is_target(i("f6")));
    let events = board.click(i("f6")).unwrap();
    assert!(moves(&events).is_empty());
    assert_eq!(board.session().selected_index(), None);

    board.config_mut().ignore_turn = true;
    board.click(i("f7")).unwrap();
    let events = board.click(i("f6")).unwrap();
    assert_eq!(moves(&events), vec![MoveRequest::new(i("f7"), i("f6"))]);
}

#[test]
fn test_drag_off_board_keeps_selection() {
    let mut board = board(ScriptedEngine::initial());
    board.click(i("f5")).unwrap();

    board.pointer_down(i("f5"), [11.8, 11.8]).unwrap();
    assert!(board.session().drag_state().is_some());
    let events = board.pointer_up_at([-3.0, -3.0]).unwrap();

    assert!(moves(&events).is_empty());
    assert!(board.session().drag_state().is_none());
    assert_eq!(board.session().selected_index(), Some(i("f5")));
}

#[test]
fn test_drag_without_autoselect_restores_prior_selection() {
    let mut board = board(ScriptedEngine::initial().with_targets("d3", &["d4"]));
    board.config_mut().autoselect = false;
    board.click(i("d3")).unwrap();

    board.pointer_down(i("f5"), [0.0, 0.0]).unwrap();
    let session = board.session();
    assert_eq!(session.selected_index(), Some(i("d3")));
    // highlighted targets stay with the selected cell
    assert!(session.is_target(i("d4")));
    assert!(!session.is_target(i("f6")));
    let drag = session.drag_state().unwrap();
    assert_eq!(drag.from, i("f5"));
    assert!(drag.targets.contains(&i("f6")));

    board.pointer_up(Some(i("a1"))).unwrap();
    assert_eq!(board.session().selected_index(), Some(i("d3")));
    assert!(board.session().is_target(i("d4")));
}

#[test]
fn test_drag_without_selection_has_no_targets() {
    let mut board = board(ScriptedEngine::initial());
    board.config_mut().autoselect = false;

    board.pointer_down(i("f5"), [0.0, 0.0]).unwrap();
    assert_eq!(board.session().selected_index(), None);
    assert_eq!(board.session().targets(), None);
    assert!(board.session().drag_state().is_some_and(|d| d.targets.contains(&i("f6"))));

    let events = board.pointer_up(Some(i("f6"))).unwrap();
    assert_eq!(moves(&events), vec![MoveRequest::new(i("f5"), i("f6"))]);
}

#[test]
fn test_click_empty_cell_clears_selection() {
    let mut board = board(ScriptedEngine::initial());
    board.click(i("f5")).unwrap();
    let events = board.click(i("a4")).unwrap();
    assert!(events.contains(&Event::SelectionChanged(None)));
    assert_eq!(*board.session().state(), Interaction::Idle);
}

#[test]
fn test_cancel_promotion_restores_selection() {
    let engine = ScriptedEngine::from_placement(PROMOTION).with_targets("f10", &["f11"]);
    let mut board = board(engine);

    board.click(i("f10")).unwrap();
    board.click(i("f11")).unwrap();
    assert!(board.session().pending_promotion().is_some());

    board.cancel_promotion().unwrap();
    assert_eq!(board.session().selected_index(), Some(i("f10")));
    assert!(board.session().is_target(i("f11")));
    assert!(board.engine().applied.is_empty());

    // nothing pending: no-op
    assert!(board.cancel_promotion().unwrap().is_empty());
    assert_eq!(board.session().selected_index(), Some(i("f10")));
}

#[test]
fn test_click_during_promotion_cancels_it() {
    let engine = ScriptedEngine::from_placement(PROMOTION).with_targets("f10", &["f11"]);
    let mut board = board(engine);
    board.click(i("f10")).unwrap();
    board.click(i("f11")).unwrap();

    let events = board.click(i("a1")).unwrap();
    assert_eq!(events, vec![Event::Clicked(i("a1"))]);
    assert_eq!(board.session().selected_index(), Some(i("f10")));
    assert!(board.session().pending_promotion().is_none());
}

#[test]
fn test_promotion_errors() {
    let engine = ScriptedEngine::from_placement(PROMOTION).with_targets("f10", &["f11"]);
    let mut board = board(engine);
    assert_eq!(board.promote('q'), Err(SessionError::NoPendingPromotion));

    board.click(i("f10")).unwrap();
    board.click(i("f11")).unwrap();
    assert!(matches!(
        board.promote('p'),
        Err(SessionError::InvalidPromotion(_))
    ));
    assert!(board.session().pending_promotion().is_some());

    let events = board.promote('n').unwrap();
    assert_eq!(
        moves(&events),
        vec![MoveRequest::new(i("f10"), i("f11")).with_promotion(Promotion::Knight)]
    );
}

#[test]
fn test_pointer_down_on_target_allows_click_move() {
    let mut board = board(ScriptedEngine::initial());
    board.click(i("f5")).unwrap();

    board.pointer_down(i("f6"), [0.0, 0.0]).unwrap();
    assert!(board.session().drag_state().is_none());
    board.pointer_up(Some(i("f6"))).unwrap();

    let events = board.click(i("f6")).unwrap();
    assert_eq!(moves(&events), vec![MoveRequest::new(i("f5"), i("f6"))]);
}

#[test]
fn test_flipped_drop_hit_tests_mirrored_board() {
    let mut board = board(ScriptedEngine::initial());
    board.click(i("f5")).unwrap();

    board.set_config(BoardConfig::playing(Playing::Both).with_flipped(true));
    assert_eq!(board.session().selected_index(), Some(i("f5")));

    let f6 = layout().cell(i("f6")).unwrap();
    board.pointer_down(i("f5"), [0.0, 0.0]).unwrap();
    let events = board.pointer_up_at(project(f6.center_for(true))).unwrap();
    assert_eq!(moves(&events), vec![MoveRequest::new(i("f5"), i("f6"))]);
}

#[test]
fn test_inactive_board() {
    let mut board = board(ScriptedEngine::initial());
    board.pointer_down(i("f5"), [0.0, 0.0]).unwrap();
    board.config_mut().active = false;

    let events = board.pointer_up(Some(i("f6"))).unwrap();
    assert!(moves(&events).is_empty());
    assert!(board.session().drag_state().is_none());

    assert!(board.click(i("f5")).unwrap().is_empty());
    board.pointer_enter(i("f5")).unwrap();
    assert_eq!(board.session().hovered_index(), None);
    assert_eq!(board.cursor(), Cursor::Default);
}

#[test]
fn test_replace_engine_resets_session() {
    let mut board = board(ScriptedEngine::initial());
    board.click(i("f5")).unwrap();

    let old = board.replace_engine(ScriptedEngine::from_placement(PROMOTION));
    assert_eq!(old.occupants.len(), 36);
    assert_eq!(*board.session().state(), Interaction::Idle);
}

#[test]
fn test_host_sets_and_clears_selection() {
    let mut board = Hexboard::new(ScriptedEngine::initial(), BoardConfig::default());

    let events = board.select(i("f7")).unwrap();
    assert_eq!(events, vec![Event::SelectionChanged(Some(i("f7")))]);
    assert!(board.session().is_target(i("f6")));

    // a host selection interrupts a drag
    board.set_config(BoardConfig::playing(Playing::Both));
    board.pointer_down(i("f5"), [0.0, 0.0]).unwrap();
    board.select(i("f7")).unwrap();
    assert!(board.session().drag_state().is_none());
    assert_eq!(board.session().selected_index(), Some(i("f7")));

    let events = board.clear_selection().unwrap();
    assert_eq!(events, vec![Event::SelectionChanged(None)]);
    assert!(board.clear_selection().unwrap().is_empty());
}

// ============================================================================
// ENGINE FAILURES
// ============================================================================

#[test]
fn test_target_failure_means_no_targets() {
    init_tracing();
    let mut engine = ScriptedEngine::initial();
    engine.fail_targets = true;
    let mut board = board(engine);

    board.click(i("f5")).unwrap();
    assert_eq!(board.session().selected_index(), Some(i("f5")));
    assert!(board.session().targets().is_some_and(|t| t.is_empty()));
    assert!(moves(&board.click(i("f6")).unwrap()).is_empty());
}

#[test]
fn test_rejected_move_is_reported() {
    init_tracing();
    let mut engine = ScriptedEngine::initial();
    engine.reject_moves = true;
    let mut board = board(engine);

    board.click(i("f5")).unwrap();
    let events = board.click(i("f6")).unwrap();
    let mv = MoveRequest::new(i("f5"), i("f6"));
    assert!(events.contains(&Event::Move(mv)));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::MoveRejected { mv: rejected, reason: EngineError::Unavailable(_) } if *rejected == mv
    )));
    assert_eq!(*board.session().state(), Interaction::Idle);
    assert!(board.engine().applied.is_empty());
}

#[test]
fn test_stale_targets_are_rechecked() {
    let config = BoardConfig::playing(Playing::Both);
    let mut session = Session::new();
    session
        .handle(&ScriptedEngine::initial(), &config, Input::Click(i("f5")))
        .unwrap();
    assert!(session.is_target(i("f6")));

    // the position changed under the selection without a reset
    let changed = ScriptedEngine::initial().with_targets("f5", &[]);
    let events = session
        .handle(&changed, &config, Input::Click(i("f6")))
        .unwrap();
    assert!(moves(&events).is_empty());
    assert_eq!(*session.state(), Interaction::Idle);
}

// ============================================================================
// GATING
// ============================================================================

#[test]
fn test_gating_table() {
    let playings = [
        Playing::None,
        Playing::Both,
        Playing::Only(Color::White),
        Playing::Only(Color::Black),
    ];

    for playing in playings {
        for ignore_turn in [false, true] {
            for autoselect in [false, true] {
                for (cell, color) in [("f5", Color::White), ("f7", Color::Black)] {
                    let case = format!(
                        "{playing:?} ignore_turn={ignore_turn} autoselect={autoselect} {cell}"
                    );
                    let config = BoardConfig::default()
                        .with_active(true)
                        .with_playing(playing)
                        .with_ignore_turn(ignore_turn)
                        .with_autoselect(autoselect);
                    let draggable = playing.allows(color);
                    let movable = draggable && (ignore_turn || color == Color::White);

                    // selection for inspection is always allowed
                    let mut board = Hexboard::new(ScriptedEngine::initial(), config.clone());
                    board.click(i(cell)).unwrap();
                    assert_eq!(board.session().selected_index(), Some(i(cell)), "{case}");
                    let events = board.click(i("f6")).unwrap();
                    assert_eq!(moves(&events).len(), usize::from(movable), "click {case}");

                    // dragging
                    let mut board = Hexboard::new(ScriptedEngine::initial(), config.clone());
                    board.pointer_down(i(cell), [0.0, 0.0]).unwrap();
                    assert_eq!(board.session().drag_state().is_some(), draggable, "drag {case}");
                    let expected = (autoselect && draggable).then(|| i(cell));
                    assert_eq!(board.session().selected_index(), expected, "autoselect {case}");
                    let events = board.pointer_up(Some(i("f6"))).unwrap();
                    assert_eq!(moves(&events).len(), usize::from(movable), "drop {case}");

                    // cursor
                    let mut board = Hexboard::new(ScriptedEngine::initial(), config);
                    board.pointer_enter(i(cell)).unwrap();
                    let cursor = if draggable { Cursor::Grab } else { Cursor::Pointer };
                    assert_eq!(board.cursor(), cursor, "cursor {case}");
                }
            }
        }
    }
}

#[test]
fn test_black_to_move() {
    let engine = ScriptedEngine::initial().with_turn(Color::Black);
    let mut board = Hexboard::new(engine, BoardConfig::playing(Playing::Only(Color::Black)));

    board.pointer_down(i("f7"), [0.0, 0.0]).unwrap();
    let events = board.pointer_up(Some(i("f6"))).unwrap();
    assert_eq!(moves(&events), vec![MoveRequest::new(i("f7"), i("f6"))]);
    assert_eq!(board.engine().turn(), Color::White);
}

// ============================================================================
// HOVER
// ============================================================================

#[test]
fn test_label_emphasis_follows_hover() {
    let mut board = board(ScriptedEngine::initial());
    assert!(board
        .label_emphasis()
        .iter()
        .all(|e| *e == LabelEmphasis::Normal));

    board.pointer_enter(i("f5")).unwrap();
    let emphasis = board.label_emphasis();
    let active = emphasis.iter().filter(|e| **e == LabelEmphasis::Active).count();
    // file f once, rank 5 on both sides
    assert_eq!(active, 3);

    board.pointer_leave(i("e5")).unwrap();
    assert_eq!(board.session().hovered_index(), Some(i("f5")));
    board.pointer_leave(i("f5")).unwrap();
    assert!(board
        .label_emphasis()
        .iter()
        .all(|e| *e == LabelEmphasis::Normal));
}

// ============================================================================
// RANDOMIZED SEQUENCES
// ============================================================================

fn random_input(rng: &mut ChaCha8Rng) -> Input {
    let cell = rng.gen_range(0..CELL_COUNT);
    match rng.gen_range(0..10) {
        0 => Input::PointerEnter(cell),
        1 => Input::PointerLeave(cell),
        2 => Input::PointerDown {
            index: cell,
            pointer: [rng.gen_range(0.0..23.6), rng.gen_range(0.0..23.6)],
        },
        3 => Input::PointerMove([rng.gen_range(0.0..23.6), rng.gen_range(0.0..23.6)]),
        4 => Input::PointerUp(rng.gen_bool(0.8).then_some(cell)),
        5 | 6 => Input::Click(cell),
        7 => Input::CancelKey,
        8 => Input::Promote(['q', 'r', 'b', 'n', 'k', 'x'][rng.gen_range(0..6)]),
        _ => Input::CancelPromotion,
    }
}

#[test]
fn test_random_sequences_keep_invariants() {
    for seed in 0..8 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let config = BoardConfig::playing(Playing::Both).with_ignore_turn(seed % 2 == 0);
        let mut board = Hexboard::new(ScriptedEngine::from_placement(INITIAL), config);
        let mut pending_legal = FxHashSet::default();

        for _ in 0..500 {
            let input = random_input(&mut rng);
            let before = board.engine().clone();
            let was_up = matches!(input, Input::PointerUp(_));

            let Ok(events) = board.dispatch(input) else {
                continue;
            };

            if was_up {
                assert!(board.session().drag_state().is_none(), "seed {seed}");
            }
            for event in &events {
                match event {
                    Event::Move(mv) => {
                        let legal = before.legal_targets(mv.from).unwrap_or_default();
                        assert!(
                            legal.contains(&mv.to) || pending_legal.contains(&(mv.from, mv.to)),
                            "seed {seed}: {mv} was not a legal target"
                        );
                    }
                    Event::PromotionRequested { from, to } => {
                        pending_legal.insert((*from, *to));
                    }
                    Event::MoveRejected { mv, .. } => panic!("seed {seed}: {mv} rejected"),
                    _ => {}
                }
            }

            if let Some(pending) = board.session().pending_promotion() {
                assert_eq!(board.session().selected_index(), Some(pending.from));
                assert!(board.session().targets().is_none());
            }
        }
    }
}
