//! Office layout generation.
//!
//! `generate(n)` is a pure function of the (clamped) headcount: the same
//! input always yields the same grid, desks, decorations and coffee station.
//!
//! Room shape:
//!
//! ```text
//!  row 0-1   back wall (whiteboard, clock, window)
//!  row 2-3   desk row A            chairs on row 4 face up
//!  row 4-6   aisle
//!  row 6     chairs face down      (only with > 3 members)
//!  row 7-8   desk row B
//!  ...
//!  rows-3    coffee machine (1×2), approached from the row above
//!  rows-1    front wall
//! ```

use crate::constants::{footprints, room};
use crate::pathfinding::{find_path, Cell, Direction, WalkGrid};
use serde::{Deserialize, Serialize};

/// One workstation: desk footprint, its chair and its PC prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desk {
    /// Top-left tile of the 2×2 desk.
    pub anchor: Cell,
    pub chair: Cell,
    pub chair_facing: Direction,
    pub workstation: Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    Whiteboard,
    Window,
    Clock,
    Bookshelf,
    Plant,
    CoffeeMachine,
}

impl DecorationKind {
    /// (width, height) in tiles.
    pub fn footprint(self) -> (i32, i32) {
        match self {
            DecorationKind::Whiteboard => footprints::WHITEBOARD,
            DecorationKind::Window => footprints::WINDOW,
            DecorationKind::Clock => footprints::CLOCK,
            DecorationKind::Bookshelf => footprints::BOOKSHELF,
            DecorationKind::Plant => footprints::PLANT,
            DecorationKind::CoffeeMachine => footprints::COFFEE_MACHINE,
        }
    }

    /// Wall-mounted decorations live in the back-wall rows and never block
    /// floor tiles.
    pub fn is_wall_mounted(self) -> bool {
        matches!(
            self,
            DecorationKind::Whiteboard | DecorationKind::Window | DecorationKind::Clock
        )
    }

    pub fn sprite_key(self) -> &'static str {
        use crate::sprites::keys;
        match self {
            DecorationKind::Whiteboard => keys::WHITEBOARD,
            DecorationKind::Window => keys::WINDOW,
            DecorationKind::Clock => keys::CLOCK,
            DecorationKind::Bookshelf => keys::BOOKSHELF,
            DecorationKind::Plant => keys::PLANT,
            DecorationKind::CoffeeMachine => keys::COFFEE_MACHINE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    #[serde(rename = "type")]
    pub kind: DecorationKind,
    pub col: i32,
    pub row: i32,
}

impl Decoration {
    pub fn new(kind: DecorationKind, col: i32, row: i32) -> Self {
        Self { kind, col, row }
    }

    /// Every tile covered by the decoration.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (w, h) = self.kind.footprint();
        (self.row..self.row + h).flat_map(move |r| (self.col..self.col + w).map(move |c| Cell::new(c, r)))
    }
}

/// Coffee machine position (top tile of its 1×2 footprint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoffeeStation {
    pub col: i32,
    pub row: i32,
}

impl CoffeeStation {
    /// The walkable tile directly in front of (above) the machine.
    pub fn approach(&self) -> Cell {
        Cell::new(self.col, self.row - 1)
    }
}

/// A generated room. Regenerated, never mutated, when the roster changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeLayout {
    pub cols: usize,
    pub rows: usize,
    pub grid: WalkGrid,
    pub desks: Vec<Desk>,
    /// Wall decorations, then floor decorations, then the coffee machine.
    pub decorations: Vec<Decoration>,
    pub coffee_station: CoffeeStation,
    /// Indices of desks whose chair needed the connectivity repair.
    pub repaired_chairs: Vec<usize>,
}

impl OfficeLayout {
    pub fn member_capacity(&self) -> usize {
        self.desks.len()
    }

    pub fn is_double_row(&self) -> bool {
        self.rows == room::DOUBLE_ROW_ROWS
    }
}

/// Clamp a requested headcount into the supported range.
pub fn clamp_headcount(n: usize) -> usize {
    n.clamp(room::MIN_MEMBERS, room::MAX_MEMBERS)
}

/// Room dimensions (cols, rows) for a clamped headcount.
pub fn room_size(count: usize) -> (usize, usize) {
    let per_row = if count <= room::SINGLE_ROW_MAX {
        count
    } else {
        count.div_ceil(2)
    };
    // side walls + desk/gap pairs + margin
    let cols = room::MIN_COLS.max(2 + per_row * 3 + 2);
    let rows = if count <= room::SINGLE_ROW_MAX {
        room::SINGLE_ROW_ROWS
    } else {
        room::DOUBLE_ROW_ROWS
    };
    (cols, rows)
}

/// Generate the office for `member_count` (clamped to 2–8).
pub fn generate(member_count: usize) -> OfficeLayout {
    let count = clamp_headcount(member_count);
    let (cols, rows) = room_size(count);
    let (c, r) = (cols as i32, rows as i32);
    let mut grid = WalkGrid::new(cols, rows);

    // Walls
    grid.block_area(0, 0, c, room::WALL_ROWS as i32);
    grid.block_area(0, r - 1, c, 1);
    grid.block_area(0, 0, 1, r);
    grid.block_area(c - 1, 0, 1, r);

    let desks = arrange_desks(count, c);
    let (dw, dh) = footprints::DESK;
    for d in &desks {
        grid.block_area(d.anchor.col, d.anchor.row, dw, dh);
    }

    let mut decorations = wall_decorations(c);
    for deco in floor_decorations(c, r) {
        let (w, h) = deco.kind.footprint();
        grid.block_area(deco.col, deco.row, w, h);
        decorations.push(deco);
    }

    let coffee_station = CoffeeStation {
        col: c / 2,
        row: r - 3,
    };
    let (cw, ch) = footprints::COFFEE_MACHINE;
    grid.block_area(coffee_station.col, coffee_station.row, cw, ch);
    decorations.push(Decoration::new(
        DecorationKind::CoffeeMachine,
        coffee_station.col,
        coffee_station.row,
    ));

    // Chairs are occupiable; the machine is approached from above.
    for d in &desks {
        grid.set(d.chair, true);
    }
    grid.set(coffee_station.approach(), true);

    let repaired_chairs = repair_connectivity(&mut grid, &desks, coffee_station.approach());

    OfficeLayout {
        cols,
        rows,
        grid,
        desks,
        decorations,
        coffee_station,
        repaired_chairs,
    }
}

/// A centred row of `n` desks starting at `desk_row`.
fn desk_row(n: usize, cols: i32, desk_row: i32, facing: Direction) -> Vec<Desk> {
    let (dw, dh) = footprints::DESK;
    let n = n as i32;
    let total = n * dw + (n - 1) * room::DESK_GAP;
    let start = (cols - total) / 2;
    (0..n)
        .map(|i| {
            let col = start + i * (dw + room::DESK_GAP);
            let (chair_row, pc_row) = match facing {
                // chair below the desk, PC on the back edge
                Direction::Up => (desk_row + dh, desk_row),
                // chair above the desk, PC on the front edge
                _ => (desk_row - 1, desk_row + 1),
            };
            Desk {
                anchor: Cell::new(col, desk_row),
                chair: Cell::new(col, chair_row),
                chair_facing: facing,
                workstation: Cell::new(col + 1, pc_row),
            }
        })
        .collect()
}

fn arrange_desks(count: usize, cols: i32) -> Vec<Desk> {
    let top_row = room::WALL_ROWS as i32;
    if count <= room::SINGLE_ROW_MAX {
        return desk_row(count, cols, top_row, Direction::Up);
    }
    let top = count.div_ceil(2);
    let bottom = count - top;
    let bottom_row = top_row + footprints::DESK.1 + room::AISLE_ROWS;
    let mut desks = desk_row(top, cols, top_row, Direction::Up);
    desks.extend(desk_row(bottom, cols, bottom_row, Direction::Down));
    desks
}

fn wall_decorations(cols: i32) -> Vec<Decoration> {
    let whiteboard_col = 2;
    let whiteboard_end = whiteboard_col + footprints::WHITEBOARD.0;
    let window_col = (cols - 4).min(cols / 2);
    let between = (whiteboard_end + window_col) / 2;
    let clock_col = if between > whiteboard_end && between < window_col {
        between
    } else {
        (window_col + footprints::WINDOW.0 + 1).min(cols - 2)
    };
    vec![
        Decoration::new(DecorationKind::Whiteboard, whiteboard_col, 0),
        Decoration::new(DecorationKind::Window, window_col, 0),
        Decoration::new(DecorationKind::Clock, clock_col, 0),
    ]
}

fn floor_decorations(cols: i32, rows: i32) -> Vec<Decoration> {
    let top = room::WALL_ROWS as i32;
    vec![
        Decoration::new(DecorationKind::Bookshelf, 1, top),
        Decoration::new(DecorationKind::Plant, cols - 2, top),
        Decoration::new(DecorationKind::Plant, 1, rows - 3),
        Decoration::new(DecorationKind::Plant, cols - 2, rows - 3),
    ]
}

/// Open the four neighbours of any chair that cannot reach `target`.
/// Local, best-effort: it does not guarantee reachability between arbitrary
/// cells. Returns the indices of repaired desks.
fn repair_connectivity(grid: &mut WalkGrid, desks: &[Desk], target: Cell) -> Vec<usize> {
    let mut repaired = Vec::new();
    for (i, desk) in desks.iter().enumerate() {
        if desk.chair == target || !find_path(grid, desk.chair, target).is_empty() {
            continue;
        }
        for n in desk.chair.neighbors() {
            grid.set(n, true);
        }
        repaired.push(i);
    }
    repaired
}
