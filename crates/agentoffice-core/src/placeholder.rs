//! Placeholder sprite art.
//!
//! Flat-colored blocks for every furniture, tile and effect key, plus simple
//! character frames painted in the master outfit colors so per-seat recoloring
//! works. Used by the headless harness and tests when no real sprite sheet is
//! loaded.

use agentoffice_logic::animation::{sprite_key, Animation};
use agentoffice_logic::constants::{CHARACTER_HEIGHT, CHARACTER_WIDTH, TILE_SIZE};
use agentoffice_logic::palette::PaletteTable;
use agentoffice_logic::pathfinding::Direction;
use agentoffice_logic::raster::{Color, PixelGrid};
use agentoffice_logic::sprites::{keys, SpriteBook};

const ANIMATIONS: [Animation; 5] = [
    Animation::Walk,
    Animation::Type,
    Animation::Read,
    Animation::Sleep,
    Animation::Celebrate,
];

/// (key, width, height) in source pixels.
const BLOCKS: [(&str, usize, usize); 11] = [
    (keys::FLOOR_TILE, 1, 1),
    (keys::WALL_TILE, 1, 1),
    (keys::DESK, 2, 2),
    (keys::CHAIR_UP, 1, 1),
    (keys::CHAIR_DOWN, 1, 1),
    (keys::PC, 1, 1),
    (keys::BOOKSHELF, 1, 2),
    (keys::PLANT, 1, 2),
    (keys::COFFEE_MACHINE, 1, 2),
    (keys::WHITEBOARD, 2, 1),
    (keys::WINDOW, 2, 2),
];

const GLYPHS: [&str; 5] = [
    keys::CLOCK,
    keys::FX_ENVELOPE,
    keys::FX_IDEA,
    keys::FX_TASK,
    keys::FX_SLEEP,
];

/// Stable color for a key (FNV-1a of its bytes).
pub fn placeholder_color(key: &str) -> Color {
    let hash = key
        .bytes()
        .fold(0x811c_9dc5_u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
    Color::rgb((hash >> 16) as u8, (hash >> 8) as u8, hash as u8)
}

/// A library with an entry for every key the office draws.
pub fn placeholder_book() -> SpriteBook {
    let mut book = SpriteBook::new();
    let t = TILE_SIZE as usize;

    for (key, w, h) in BLOCKS {
        book.insert_grid(key, PixelGrid::filled(w * t, h * t, placeholder_color(key)));
    }
    for key in GLYPHS {
        if key == keys::CLOCK {
            book.insert_grid(key, PixelGrid::filled(t, t, placeholder_color(key)));
        } else {
            book.insert_grid(key, PixelGrid::filled(8, 8, placeholder_color(key)));
        }
    }

    for direction in [Direction::Up, Direction::Down, Direction::Right] {
        for animation in ANIMATIONS {
            for (variant, suffix) in animation.suffixes().iter().enumerate() {
                book.insert_grid(
                    sprite_key(direction, animation, suffix),
                    character_frame(direction, variant),
                );
            }
        }
    }
    book
}

/// A 16×24 figure in the master outfit. `variant` shifts the feet so frames
/// of one animation differ.
fn character_frame(direction: Direction, variant: usize) -> PixelGrid {
    let outfit = PaletteTable::standard().master();
    let (w, h) = (CHARACTER_WIDTH as usize, CHARACTER_HEIGHT as usize);
    let mut grid = PixelGrid::new(w, h);
    let fill = |grid: &mut PixelGrid, x0: usize, x1: usize, y0: usize, y1: usize, c: Color| {
        for y in y0..y1 {
            for x in x0..x1 {
                grid.set(x, y, Some(c));
            }
        }
    };

    fill(&mut grid, 4, 12, 0, 3, outfit.hair);
    fill(&mut grid, 4, 12, 3, 8, outfit.skin);
    fill(&mut grid, 3, 13, 8, 15, outfit.shirt);
    fill(&mut grid, 4, 12, 15, 21, outfit.pants);
    let shift = variant % 2;
    fill(&mut grid, 4 + shift, 7 + shift, 21, 24, outfit.shoes);
    fill(&mut grid, 9 - shift, 12 - shift, 21, 24, outfit.shoes);

    // Face marker so facing is visible
    match direction {
        Direction::Right => fill(&mut grid, 10, 12, 4, 6, Color::BLACK),
        Direction::Down => {
            fill(&mut grid, 5, 7, 4, 6, Color::BLACK);
            fill(&mut grid, 9, 11, 4, 6, Color::BLACK);
        }
        Direction::Up => fill(&mut grid, 4, 12, 3, 6, outfit.hair),
        Direction::Left => fill(&mut grid, 4, 6, 4, 6, Color::BLACK),
    }
    grid
}
