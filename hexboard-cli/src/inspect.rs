//! Inspect commands - dump layout geometry as JSON or path descriptors
//!
//! ## Architecture
//!
//! - run_*(): one entry point per subcommand, printing to stdout
//! - CellView / LabelView: serializable projections of layout entries
//! - render helpers shared by the views

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use hexboard_core::{
    geometry::Vec2,
    layout::{layout, Cell, Label},
    render::{project, serialize},
    Coord,
};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct LayoutArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct CellArgs {
    /// Cell notation, e.g. f6
    pub notation: String,
}

#[derive(Args)]
pub struct HitArgs {
    /// Render-space x
    #[arg(allow_hyphen_values = true)]
    pub x: f64,

    /// Render-space y
    #[arg(allow_hyphen_values = true)]
    pub y: f64,
}

// ============================================================================
// VIEWS
// ============================================================================

/// A cell as displayed, in render coordinates
#[derive(Clone, Debug, Serialize)]
pub struct CellView {
    pub index: usize,
    pub notation: String,
    pub color: u8,
    pub center: Vec2,
    pub path: Vec<Vec2>,
    /// Serialized path descriptor
    pub d: String,
}

impl CellView {
    pub fn new(cell: &Cell, flipped: bool) -> Self {
        let path = cell.path_for(flipped);
        Self {
            index: cell.index,
            notation: cell.coord.to_string(),
            color: cell.color,
            center: project(cell.center_for(flipped)),
            path: path.iter().copied().map(project).collect(),
            d: serialize(&path),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LabelView {
    pub text: String,
    pub anchor: Vec2,
}

impl LabelView {
    pub fn new(label: &Label, flipped: bool) -> Self {
        Self {
            text: label.text.clone(),
            anchor: project(label.anchor_for(flipped)),
        }
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}

// ============================================================================
// COMMANDS
// ============================================================================

pub fn cell_views(flipped: bool) -> Vec<CellView> {
    layout()
        .cells()
        .iter()
        .map(|cell| CellView::new(cell, flipped))
        .collect()
}

pub fn run_layout(args: LayoutArgs, flipped: bool) -> Result<()> {
    let views = cell_views(flipped);
    tracing::debug!("Dumping {} cells (flipped: {})", views.len(), flipped);
    println!("{}", to_json(&views, args.pretty)?);
    Ok(())
}

pub fn run_cell(args: CellArgs, flipped: bool) -> Result<()> {
    let coord: Coord = args
        .notation
        .parse()
        .with_context(|| format!("Invalid cell '{}'", args.notation))?;
    let Some(cell) = layout().cell_at(coord) else {
        bail!("Cell {} is not on the board", coord);
    };
    println!("{}", to_json(&CellView::new(cell, flipped), true)?);
    Ok(())
}

pub fn run_labels(flipped: bool) -> Result<()> {
    let views: Vec<LabelView> = layout()
        .labels()
        .iter()
        .map(|label| LabelView::new(label, flipped))
        .collect();
    println!("{}", to_json(&views, true)?);
    Ok(())
}

pub fn perimeter_path(flipped: bool) -> String {
    serialize(&layout().perimeter_for(flipped))
}

pub fn run_perimeter(flipped: bool) -> Result<()> {
    println!("{}", perimeter_path(flipped));
    Ok(())
}

pub fn hit(point: Vec2, flipped: bool) -> Option<Coord> {
    layout()
        .hit_test(point, flipped)
        .and_then(|index| layout().cell(index))
        .map(|cell| cell.coord)
}

pub fn run_hit(args: HitArgs, flipped: bool) -> Result<()> {
    match hit([args.x, args.y], flipped) {
        Some(coord) => println!("{}", coord),
        None => {
            tracing::info!("({}, {}) is off the board", args.x, args.y);
            println!("-");
        }
    }
    Ok(())
}
