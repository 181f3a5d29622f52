//! Projection into render space and closed-path serialization

use crate::geometry::Vec2;

/// Side of the square render viewport; larger values zoom out
pub const VIEWBOX: f64 = 23.6;

/// Decimal places used for path coordinates
pub const PRECISION: usize = 8;

/// Map a geometry-space point to render space (origin centered, Y down)
pub fn project(point: Vec2) -> Vec2 {
    [(VIEWBOX / 2.0) + point[0], (VIEWBOX / 2.0) - point[1]]
}

/// Inverse of [`project`]
pub fn unproject(point: Vec2) -> Vec2 {
    [point[0] - (VIEWBOX / 2.0), (VIEWBOX / 2.0) - point[1]]
}

/// Format a coordinate at fixed precision.
///
/// Values that round to zero print as `0`, so a point reached through two
/// different cells formats identically even if the sign of the error differs.
pub fn rounded(n: f64) -> String {
    let s = format!("{:.*}", PRECISION, n);
    match s.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => s,
    }
}

/// Serialize points into a closed polygon path: `M x y L x y ... Z`.
///
/// Points are projected first. Empty input yields an empty descriptor.
pub fn serialize<'a, I>(points: I) -> String
where
    I: IntoIterator<Item = &'a Vec2>,
{
    let mut points = points.into_iter().map(|p| project(*p));
    let Some(origin) = points.next() else {
        return String::new();
    };

    let mut path = format!("M {} {}", rounded(origin[0]), rounded(origin[1]));
    let mut first = true;
    for point in points {
        path.push_str(if first { " L " } else { " " });
        path.push_str(&rounded(point[0]));
        path.push(' ');
        path.push_str(&rounded(point[1]));
        first = false;
    }
    path.push_str(" Z");
    path
}
