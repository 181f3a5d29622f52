//! Board layout table
//!
//! The 91 cells, 33 edge labels and the board perimeter are generated once
//! from the geometry kernel and are read-only afterwards. Cells are built
//! directly in canonical index order, so `cells()[i].index == i`.
//!
//! Mirrored ("flipped board") geometry is never stored: it is the point
//! reflection of the primary geometry and is derived on demand.

use crate::coord::{files_in_rank, Coord, NotationError, CELL_COUNT, FILES, RANKS};
use crate::geometry::{
    bilerp, flip, hexagon, pivot, reflect, ring, sum, Hexagon, Vec2, ONE, ORIGIN, SIDE_LENGTH,
};
use crate::render::unproject;
use serde::Serialize;
use std::sync::LazyLock;

/// Label anchors sit this far along the inner-to-edge cell line (past the edge cell)
pub const LABEL_OFFSET: f64 = 1.7;

/// Number of labels around the board
pub const LABEL_COUNT: usize = 33;

/// Number of points in the perimeter outline
pub const PERIMETER_LEN: usize = 93;

static LAYOUT: LazyLock<Layout> = LazyLock::new(Layout::build);

/// The shared board layout
pub fn layout() -> &'static Layout {
    &LAYOUT
}

// ============================================================================
// CELLS
// ============================================================================

/// A board cell
#[derive(Clone, Debug, Serialize)]
pub struct Cell {
    pub index: usize,
    pub coord: Coord,
    /// Color class 0, 1 or 2
    pub color: u8,
    pub center: Vec2,
    pub path: Hexagon,
}

impl Cell {
    pub fn mirrored_center(&self) -> Vec2 {
        reflect(self.center)
    }

    pub fn mirrored_path(&self) -> Hexagon {
        flip(self.path)
    }

    /// Center in the orientation being displayed
    pub fn center_for(&self, flipped: bool) -> Vec2 {
        if flipped {
            self.mirrored_center()
        } else {
            self.center
        }
    }

    /// Vertex path in the orientation being displayed
    pub fn path_for(&self, flipped: bool) -> Hexagon {
        if flipped {
            self.mirrored_path()
        } else {
            self.path
        }
    }

    /// Whether a geometry-space point lies inside this cell (unflipped)
    pub fn contains(&self, point: Vec2) -> bool {
        let dx = (point[0] - self.center[0]).abs();
        let dy = (point[1] - self.center[1]).abs();
        let apothem = ONE / 2.0;
        let sqrt_3 = 3f64.sqrt();
        dy <= apothem + 1e-9 && sqrt_3 * dx + dy <= sqrt_3 * SIDE_LENGTH + 1e-9
    }
}

/// Center of a cell.
///
/// The sixth rank is laid out by pivoting away from f6 at 150 degrees
/// (files a-e) and 30 degrees (files g-l); every other rank is a vertical
/// translation of it.
pub fn cell_center(coord: Coord) -> Vec2 {
    let offset = coord.file_offset();
    let distance = ring(offset.unsigned_abs() as usize);
    let base = match offset {
        0 => ORIGIN,
        o if o < 0 => pivot(ORIGIN, 150.0, distance),
        _ => pivot(ORIGIN, 30.0, distance),
    };
    sum(base, [0.0, ONE * f64::from(coord.rank_offset())])
}

/// Color class of a cell; edge-adjacent cells never share one
pub fn color_class(coord: Coord) -> u8 {
    (1 + coord.file_offset().abs() - coord.rank_offset()).rem_euclid(3) as u8
}

// ============================================================================
// LABELS
// ============================================================================

/// A rank or file label. Text is not unique: ranks are labeled on both sides.
#[derive(Clone, Debug, Serialize)]
pub struct Label {
    pub text: String,
    pub anchor: Vec2,
}

/// Display emphasis of a label relative to the hovered cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LabelEmphasis {
    /// Nothing is hovered
    Normal,
    /// Label names the hovered cell's file or rank
    Active,
    Inactive,
}

impl Label {
    pub fn mirrored_anchor(&self) -> Vec2 {
        reflect(self.anchor)
    }

    pub fn anchor_for(&self, flipped: bool) -> Vec2 {
        if flipped {
            self.mirrored_anchor()
        } else {
            self.anchor
        }
    }

    pub fn emphasis(&self, hovered: Option<Coord>) -> LabelEmphasis {
        match hovered {
            None => LabelEmphasis::Normal,
            Some(c) if self.text == c.file_char().to_string() || self.text == c.rank.to_string() => {
                LabelEmphasis::Active
            }
            Some(_) => LabelEmphasis::Inactive,
        }
    }
}

/// Label just outside `edge`, continuing the line from its inward neighbor
fn edge_label(text: String, edge: Coord, outward: f64) -> Label {
    let outer = cell_center(edge);
    let inner = pivot(outer, outward + 180.0, ONE);
    Label {
        text,
        anchor: bilerp(inner, outer, LABEL_OFFSET),
    }
}

fn build_labels() -> Vec<Label> {
    let mut labels = Vec::with_capacity(LABEL_COUNT);

    // left edge, top to bottom
    for rank in (1..=RANKS).rev() {
        let edge = Coord::new(*files_in_rank(rank).start(), rank);
        labels.push(edge_label(rank.to_string(), edge, 150.0));
    }

    // bottom edge, left to right
    for (file, letter) in FILES.iter().enumerate() {
        labels.push(edge_label(letter.to_string(), Coord::new(file as u8, 1), 270.0));
    }

    // right edge, bottom to top
    for rank in 1..=RANKS {
        let edge = Coord::new(*files_in_rank(rank).end(), rank);
        labels.push(edge_label(rank.to_string(), edge, 30.0));
    }

    labels
}

// ============================================================================
// PERIMETER
// ============================================================================

/// Perimeter walk: boundary cells clockwise from f11 and the vertices picked
/// from each. Runs overlap by one point where neighbors share a vertex.
const PERIMETER_RUNS: [(Coord, &[usize]); 30] = [
    (Coord::new(5, 11), &[5, 0, 1]), // f11
    (Coord::new(6, 10), &[5, 0, 1]), // g10
    (Coord::new(7, 9), &[5, 0, 1]),  // h9
    (Coord::new(8, 8), &[5, 0, 1]),  // i8
    (Coord::new(9, 7), &[5, 0, 1]),  // k7
    (Coord::new(10, 6), &[5, 0, 1, 2]), // l6
    (Coord::new(10, 5), &[0, 1, 2]), // l5
    (Coord::new(10, 4), &[0, 1, 2]), // l4
    (Coord::new(10, 3), &[0, 1, 2]), // l3
    (Coord::new(10, 2), &[0, 1, 2]), // l2
    (Coord::new(10, 1), &[0, 1, 2, 3]), // l1
    // k1 takes the same vertices as its bottom-edge neighbors: its vertex 4
    // is interior (three cells meet there) and would spike the outline inward
    (Coord::new(9, 1), &[1, 2, 3]),  // k1
    (Coord::new(8, 1), &[1, 2, 3]),  // i1
    (Coord::new(7, 1), &[1, 2, 3]),  // h1
    (Coord::new(6, 1), &[1, 2, 3]),  // g1
    (Coord::new(5, 1), &[1, 2, 3, 4]), // f1
    (Coord::new(4, 1), &[3, 4]),     // e1
    (Coord::new(3, 1), &[2, 3, 4]),  // d1
    (Coord::new(2, 1), &[2, 3, 4]),  // c1
    (Coord::new(1, 1), &[2, 3, 4]),  // b1
    (Coord::new(0, 1), &[2, 3, 4, 5]), // a1
    (Coord::new(0, 2), &[3, 4, 5]),  // a2
    (Coord::new(0, 3), &[3, 4, 5]),  // a3
    (Coord::new(0, 4), &[3, 4, 5]),  // a4
    (Coord::new(0, 5), &[3, 4, 5]),  // a5
    (Coord::new(0, 6), &[3, 4, 5]),  // a6
    (Coord::new(1, 7), &[4, 5, 0]),  // b7
    (Coord::new(2, 8), &[4, 5, 0]),  // c8
    (Coord::new(3, 9), &[4, 5, 0]),  // d9
    (Coord::new(4, 10), &[4, 5, 0]), // e10
];

fn build_perimeter(cells: &[Cell]) -> Vec<Vec2> {
    PERIMETER_RUNS
        .iter()
        .flat_map(|(coord, vertices)| {
            let path = cells[coord.index()].path;
            vertices.iter().map(move |&v| path[v])
        })
        .collect()
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Precomputed board geometry
#[derive(Debug)]
pub struct Layout {
    cells: Vec<Cell>,
    labels: Vec<Label>,
    perimeter: Vec<Vec2>,
}

impl Layout {
    fn build() -> Self {
        let cells: Vec<Cell> = Coord::all()
            .enumerate()
            .map(|(index, coord)| {
                let center = cell_center(coord);
                Cell {
                    index,
                    coord,
                    color: color_class(coord),
                    center,
                    path: hexagon(center),
                }
            })
            .collect();
        let perimeter = build_perimeter(&cells);
        let labels = build_labels();

        tracing::debug!(
            "Built board layout: {} cells, {} labels, {} perimeter points",
            cells.len(),
            labels.len(),
            perimeter.len()
        );

        Self {
            cells,
            labels,
            perimeter,
        }
    }

    /// All cells in index order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_at(&self, coord: Coord) -> Option<&Cell> {
        coord.checked_index().and_then(|index| self.cells.get(index))
    }

    pub fn cell_by_notation(&self, notation: &str) -> Result<&Cell, NotationError> {
        let coord: Coord = notation.parse()?;
        Ok(&self.cells[coord.index()])
    }

    /// Cells sharing an edge with `index`
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        let center = self.cells.get(index).map(|c| c.center);
        self.cells.iter().filter(move |other| {
            center.is_some_and(|c| {
                let d = crate::geometry::distance(c, other.center);
                (d - ONE).abs() < 1e-6
            })
        })
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Perimeter outline, clockwise from the top of f11
    pub fn perimeter(&self) -> &[Vec2] {
        &self.perimeter
    }

    pub fn perimeter_for(&self, flipped: bool) -> Vec<Vec2> {
        if flipped {
            self.perimeter.iter().copied().map(reflect).collect()
        } else {
            self.perimeter.clone()
        }
    }

    /// Cell under a render-space point, in the displayed orientation
    pub fn hit_test(&self, render_point: Vec2, flipped: bool) -> Option<usize> {
        let point = unproject(render_point);
        let point = if flipped { reflect(point) } else { point };
        self.cells
            .iter()
            .find(|cell| cell.contains(point))
            .map(|cell| cell.index)
    }
}
