//! Sprite lookup contract.
//!
//! Art assets are opaque to the simulation. A [`SpriteLibrary`] resolves a
//! string key to a [`SpriteSource`], which is either a rectangle inside a
//! packed sheet or a standalone pixel grid. The variant is fixed when the
//! library is built, so drawing code matches on it once instead of probing
//! the asset shape per frame.

use crate::constants::GAME_TILE;
use crate::raster::{Color, PixelGrid};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known library keys.
pub mod keys {
    pub const FLOOR_TILE: &str = "floor_tile";
    pub const WALL_TILE: &str = "wall_tile";
    pub const DESK: &str = "desk";
    pub const CHAIR_UP: &str = "chair_up";
    pub const CHAIR_DOWN: &str = "chair_down";
    pub const PC: &str = "pc";
    pub const BOOKSHELF: &str = "bookshelf";
    pub const PLANT: &str = "plant";
    pub const COFFEE_MACHINE: &str = "coffee_machine";
    pub const WHITEBOARD: &str = "whiteboard";
    pub const WINDOW: &str = "window";
    pub const CLOCK: &str = "clock";
    pub const FX_ENVELOPE: &str = "fx_envelope";
    pub const FX_IDEA: &str = "fx_idea";
    pub const FX_TASK: &str = "fx_task";
    pub const FX_SLEEP: &str = "fx_sleep";
}

/// Source rectangle in a packed sheet plus its on-screen size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRef {
    pub sx: u32,
    pub sy: u32,
    pub sw: u32,
    pub sh: u32,
    /// Display width in game pixels.
    pub dw: u32,
    /// Display height in game pixels.
    pub dh: u32,
    /// Object height in game tiles, used for depth.
    pub height_tiles: u32,
}

impl SpriteRef {
    /// A `w × h` game-tile object whose source is `2×` tile-sized per tile.
    pub fn tiles(sx: u32, sy: u32, w: u32, h: u32) -> Self {
        Self {
            sx,
            sy,
            sw: w * 32,
            sh: h * 32,
            dw: w * GAME_TILE,
            dh: h * GAME_TILE,
            height_tiles: h,
        }
    }
}

/// A packed RGBA sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl SpriteSheet {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Copy the referenced rectangle out as a pixel grid (fully transparent
    /// pixels become `None`). Parts outside the sheet are transparent.
    pub fn extract(&self, r: &SpriteRef) -> PixelGrid {
        let mut out = PixelGrid::new(r.sw as usize, r.sh as usize);
        for y in 0..r.sh {
            for x in 0..r.sw {
                let (px, py) = (r.sx + x, r.sy + y);
                if px >= self.width || py >= self.height {
                    continue;
                }
                let Some(&c) = self.pixels.get((py * self.width + px) as usize) else {
                    continue;
                };
                if c.a > 0 {
                    out.set(x as usize, y as usize, Some(c));
                }
            }
        }
        out
    }
}

/// A resolved sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SpriteSource {
    Sheet(SpriteRef),
    Grid(PixelGrid),
}

impl SpriteSource {
    /// Materialize as a pixel grid. Sheet references need the sheet.
    pub fn to_grid(&self, sheet: Option<&SpriteSheet>) -> Option<PixelGrid> {
        match self {
            SpriteSource::Grid(g) => Some(g.clone()),
            SpriteSource::Sheet(r) => sheet.map(|s| s.extract(r)),
        }
    }

    /// Height in game tiles; pixel grids are measured in 16px tiles.
    pub fn height_tiles(&self) -> u32 {
        match self {
            SpriteSource::Sheet(r) => r.height_tiles,
            SpriteSource::Grid(g) => (g.height as u32).div_ceil(crate::constants::TILE_SIZE).max(1),
        }
    }
}

/// Key → sprite resolution.
pub trait SpriteLibrary {
    fn lookup(&self, key: &str) -> Option<&SpriteSource>;

    /// Backing sheet for `SpriteSource::Sheet` entries, if any.
    fn sheet(&self) -> Option<&SpriteSheet> {
        None
    }

    fn lookup_grid(&self, key: &str) -> Option<PixelGrid> {
        self.lookup(key)?.to_grid(self.sheet())
    }
}

/// In-memory library, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteBook {
    #[serde(default)]
    pub sheet: Option<SpriteSheet>,
    #[serde(default)]
    pub sprites: HashMap<String, SpriteSource>,
}

impl SpriteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(sheet: SpriteSheet) -> Self {
        Self {
            sheet: Some(sheet),
            sprites: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, source: SpriteSource) {
        self.sprites.insert(key.into(), source);
    }

    pub fn insert_grid(&mut self, key: impl Into<String>, grid: PixelGrid) {
        self.insert(key, SpriteSource::Grid(grid));
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl SpriteLibrary for SpriteBook {
    fn lookup(&self, key: &str) -> Option<&SpriteSource> {
        self.sprites.get(key)
    }

    fn sheet(&self) -> Option<&SpriteSheet> {
        self.sheet.as_ref()
    }
}
