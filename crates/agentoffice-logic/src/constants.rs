//! Office constants: tile geometry, render scale, room sizing and footprints.
//!
//! Grid coordinates are in tiles; pixel coordinates are "game pixels",
//! i.e. tile pixels already multiplied by [`SCALE`].

/// Source art tile size in pixels.
pub const TILE_SIZE: u32 = 16;
/// Integer upscale applied to all pixel art.
pub const SCALE: u32 = 3;
/// Size of one grid tile on the surface (16 × 3 = 48).
pub const GAME_TILE: u32 = TILE_SIZE * SCALE;

/// Character sprite footprint in source pixels.
pub const CHARACTER_WIDTH: u32 = 16;
pub const CHARACTER_HEIGHT: u32 = 24;

pub mod room {
    /// Headcounts outside this range are clamped.
    pub const MIN_MEMBERS: usize = 2;
    pub const MAX_MEMBERS: usize = 8;
    /// Up to this many members sit in a single desk row.
    pub const SINGLE_ROW_MAX: usize = 3;

    pub const MIN_COLS: usize = 14;
    pub const SINGLE_ROW_ROWS: usize = 13;
    pub const DOUBLE_ROW_ROWS: usize = 16;

    /// Back wall height in tiles.
    pub const WALL_ROWS: usize = 2;
    /// Walkway rows between the two facing desk rows.
    pub const AISLE_ROWS: i32 = 3;
    /// Free tiles between neighbouring desks.
    pub const DESK_GAP: i32 = 1;
}

/// Footprints as (width, height) in tiles.
pub mod footprints {
    pub const DESK: (i32, i32) = (2, 2);
    pub const BOOKSHELF: (i32, i32) = (1, 2);
    pub const PLANT: (i32, i32) = (1, 2);
    pub const COFFEE_MACHINE: (i32, i32) = (1, 2);
    pub const WHITEBOARD: (i32, i32) = (2, 1);
    pub const WINDOW: (i32, i32) = (2, 2);
    pub const CLOCK: (i32, i32) = (1, 1);
}

/// Depth keys for layers that do not derive depth from a position.
pub mod depth {
    pub const FLOOR: f32 = -2.0;
    pub const EFFECTS: f32 = 99_999.0;
}
