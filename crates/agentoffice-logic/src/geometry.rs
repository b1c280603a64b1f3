//! Geometry validation for generated office layouts.
//!
//! Pure functions that take an [`OfficeLayout`] and return validation errors.
//! The generator is expected to pass all of them for every headcount 2–8.

use crate::constants::{footprints, room};
use crate::layout::OfficeLayout;
use crate::pathfinding::{find_path, reachable_cells, Cell};
use std::collections::HashMap;

/// A layout validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

// ── A. Walls ────────────────────────────────────────────────────────────

/// Back wall rows, the front wall and both side columns must be unwalkable.
pub fn check_walls(layout: &OfficeLayout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (cell, walkable) in layout.grid.cells() {
        let is_wall = (cell.row as usize) < room::WALL_ROWS
            || cell.row as usize == layout.rows - 1
            || cell.col == 0
            || cell.col as usize == layout.cols - 1;
        if is_wall && walkable {
            errors.push(error(
                "walls",
                format!("Wall tile ({}, {}) is walkable", cell.col, cell.row),
            ));
        }
    }
    errors
}

// ── B. Occupiable tiles ─────────────────────────────────────────────────

/// Chairs are occupiable; the rest of each desk footprint is blocked.
pub fn check_desk_tiles(layout: &OfficeLayout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let (w, h) = footprints::DESK;
    for (i, desk) in layout.desks.iter().enumerate() {
        if !layout.grid.is_walkable(desk.chair) {
            errors.push(error(
                "desks",
                format!("Desk #{i} chair ({}, {}) is not walkable", desk.chair.col, desk.chair.row),
            ));
        }
        for r in 0..h {
            for c in 0..w {
                let cell = desk.anchor.offset(c, r);
                if cell != desk.chair && layout.grid.is_walkable(cell) {
                    errors.push(error(
                        "desks",
                        format!("Desk #{i} footprint tile ({}, {}) is walkable", cell.col, cell.row),
                    ));
                }
            }
        }
    }
    errors
}

pub fn check_coffee_approach(layout: &OfficeLayout) -> Vec<ValidationError> {
    let approach = layout.coffee_station.approach();
    if layout.grid.is_walkable(approach) {
        return Vec::new();
    }
    vec![error(
        "coffee",
        format!("Coffee approach ({}, {}) is not walkable", approach.col, approach.row),
    )]
}

// ── C. Overlaps ─────────────────────────────────────────────────────────

/// No two floor items (desks, chairs, floor decorations, coffee machine) may
/// share a tile, and wall decorations may not overlap each other or leave
/// the wall rows.
pub fn check_overlaps(layout: &OfficeLayout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut floor: HashMap<Cell, String> = HashMap::new();
    let mut wall: HashMap<Cell, String> = HashMap::new();

    let mut claim = |map: &mut HashMap<Cell, String>, cell: Cell, owner: String| {
        if let Some(prev) = map.get(&cell) {
            errors.push(error(
                "overlap",
                format!("{owner} overlaps {prev} at ({}, {})", cell.col, cell.row),
            ));
        } else {
            map.insert(cell, owner);
        }
    };

    let (w, h) = footprints::DESK;
    for (i, desk) in layout.desks.iter().enumerate() {
        for r in 0..h {
            for c in 0..w {
                claim(&mut floor, desk.anchor.offset(c, r), format!("desk #{i}"));
            }
        }
        claim(&mut floor, desk.chair, format!("chair #{i}"));
    }
    for (i, deco) in layout.decorations.iter().enumerate() {
        let owner = format!("{:?} #{i}", deco.kind);
        for cell in deco.cells() {
            if deco.kind.is_wall_mounted() {
                claim(&mut wall, cell, owner.clone());
            } else {
                claim(&mut floor, cell, owner.clone());
            }
        }
    }
    claim(
        &mut floor,
        layout.coffee_station.approach(),
        "coffee approach".to_string(),
    );

    for (cell, owner) in &wall {
        if cell.row as usize >= room::WALL_ROWS || !layout.grid.in_bounds(*cell) {
            errors.push(error(
                "overlap",
                format!("{owner} leaves the back wall at ({}, {})", cell.col, cell.row),
            ));
        }
    }
    errors
}

// ── D. Connectivity ─────────────────────────────────────────────────────

/// Every chair must reach the coffee approach.
pub fn check_chair_connectivity(layout: &OfficeLayout) -> Vec<ValidationError> {
    let target = layout.coffee_station.approach();
    let mut errors = Vec::new();
    for (i, desk) in layout.desks.iter().enumerate() {
        if desk.chair != target && find_path(&layout.grid, desk.chair, target).is_empty() {
            errors.push(error(
                "connectivity",
                format!("Desk #{i} chair cannot reach the coffee machine"),
            ));
        }
    }
    errors
}

/// Walkable tiles that the coffee approach cannot reach. Only chair→coffee
/// is guaranteed, so this is a warning.
pub fn check_isolated_tiles(layout: &OfficeLayout) -> Vec<ValidationError> {
    let reachable = reachable_cells(&layout.grid, layout.coffee_station.approach()).len();
    let walkable = layout.grid.walkable_count();
    if reachable >= walkable {
        return Vec::new();
    }
    vec![ValidationError {
        category: "connectivity",
        severity: Severity::Warning,
        message: format!(
            "{} of {walkable} walkable tiles are unreachable from the coffee machine",
            walkable - reachable
        ),
    }]
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations and return combined results.
pub fn validate_layout(layout: &OfficeLayout) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_walls(layout));
    all.extend(check_desk_tiles(layout));
    all.extend(check_coffee_approach(layout));
    all.extend(check_overlaps(layout));
    all.extend(check_chair_connectivity(layout));
    all.extend(check_isolated_tiles(layout));
    all
}
