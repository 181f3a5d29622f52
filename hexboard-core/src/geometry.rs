//! Geometry kernel: 2D vector helpers and hexagon vertex generation
//!
//! Every point on the board is derived from the ring distances below and
//! 60 degree pivots around a cell center.

/// A 2D point or vector, geometry space is Y-up
pub type Vec2 = [f64; 2];

/// Six hexagon vertices, index-aligned (see [`hexagon`])
pub type Hexagon = [Vec2; 6];

/// The board origin (center of f6)
pub const ORIGIN: Vec2 = [0.0, 0.0];

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Side length of a regular hexagon circumscribed around a unit circle
pub const SIDE_LENGTH: f64 = 2.0 / SQRT_3;

// Distance between the centers of neighboring hexagons.
// ONE = direct neighbors, TWO = neighbor of neighbor, etc.
pub const ONE: f64 = SIDE_LENGTH * (SQRT_3 / 2.0) * 2.0;
pub const TWO: f64 = ONE * 2.0;
pub const THREE: f64 = ONE * 3.0;
pub const FOUR: f64 = ONE * 4.0;
pub const FIVE: f64 = ONE * 5.0;

/// Ring distances indexed by ring number (ring 0 is the cell itself)
pub const RINGS: [f64; 6] = [0.0, ONE, TWO, THREE, FOUR, FIVE];

/// Vertex angles in degrees, in path order
const HEXAGON_ANGLES: [f64; 6] = [-300.0, 0.0, -60.0, -120.0, -180.0, -240.0];

/// Distance of the given ring from a center
pub fn ring(n: usize) -> f64 {
    RINGS.get(n).copied().unwrap_or(ONE * n as f64)
}

/// Convert degrees to radians
pub fn radians(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

/// Move `distance` units from `point` along `deg` (counter-clockwise, 0 = +X)
pub fn pivot(point: Vec2, deg: f64, distance: f64) -> Vec2 {
    let rad = radians(deg);
    [
        (distance * rad.cos()) + point[0],
        (distance * rad.sin()) + point[1],
    ]
}

/// Vertices of the flat-top hexagon around `center`.
///
/// Order: 0 = upper right, 1 = right, 2 = lower right, 3 = lower left,
/// 4 = left, 5 = upper left. The perimeter table addresses vertices by
/// these positions.
pub fn hexagon(center: Vec2) -> Hexagon {
    HEXAGON_ANGLES.map(|deg| pivot(center, deg, SIDE_LENGTH))
}

/// Point-reflect through the origin
pub fn reflect(v: Vec2) -> Vec2 {
    [-v[0], -v[1]]
}

/// Reflect every point of a path, preserving order
pub fn flip<const N: usize>(path: [Vec2; N]) -> [Vec2; N] {
    path.map(reflect)
}

/// Linear interpolation from `p1` toward `p2`; `t > 1` extrapolates past `p2`
pub fn bilerp(p1: Vec2, p2: Vec2, t: f64) -> Vec2 {
    [
        p1[0] + (t * (p2[0] - p1[0])),
        p1[1] + (t * (p2[1] - p1[1])),
    ]
}

/// Sum two vectors
pub fn sum(v1: Vec2, v2: Vec2) -> Vec2 {
    [v1[0] + v2[0], v1[1] + v2[1]]
}

/// Euclidean distance between two points
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}
