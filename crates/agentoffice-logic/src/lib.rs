//! Pure office logic for AgentOffice.
//!
//! This crate contains everything about the pixel-art office that does not
//! need an ECS world or a running loop. Functions take plain data and return
//! results, which keeps them deterministic and unit-testable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`animation`] | Character states, status vocabulary, frame tables, persona labels |
//! | [`constants`] | Tile geometry, render scale, room sizing, furniture footprints |
//! | [`geometry`] | Generated layout validation (walls, overlaps, connectivity) |
//! | [`layout`] | Deterministic office generation from a headcount |
//! | [`palette`] | Per-seat outfit palettes with hue-rotated overflow |
//! | [`pathfinding`] | BFS shortest paths over the walkability grid |
//! | [`raster`] | Colors, HSL, pixel grids, flip/remap/colorize |
//! | [`sprites`] | Sprite lookup contract (`SpriteRef` or `PixelGrid`) |
//! | [`surface`] | CPU drawing surface with blit and alpha fills |

pub mod animation;
pub mod constants;
pub mod geometry;
pub mod layout;
pub mod palette;
pub mod pathfinding;
pub mod raster;
pub mod sprites;
pub mod surface;
