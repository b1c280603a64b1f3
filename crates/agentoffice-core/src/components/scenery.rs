//! Static scenery components.

use super::common::Vec2;
use serde::{Deserialize, Serialize};

/// A static sprite: furniture, decoration, or anything else drawn from the
/// sprite library at a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub key: String,
    pub pos: Vec2,
    pub depth: f32,
    pub flip: bool,
}

impl Prop {
    pub fn new(key: impl Into<String>, pos: Vec2, depth: f32) -> Self {
        Self {
            key: key.into(),
            pos,
            depth,
            flip: false,
        }
    }
}

/// Tiled floor and back wall covering the whole room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backdrop {
    pub cols: usize,
    pub rows: usize,
}
