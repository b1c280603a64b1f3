//! Per-seat outfit palettes.
//!
//! Every character is drawn from one master sprite set. Seat `i` recolors the
//! master outfit to `PaletteTable::get(i)`: the first six seats use curated
//! outfits, later seats reuse one of them with hair/shirt/pants hue-rotated.

use crate::raster::{hue_shift, remap_palette, Color, PixelGrid};
use serde::{Deserialize, Serialize};

/// Colors that make up a character outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outfit {
    pub skin: Color,
    pub hair: Color,
    pub shirt: Color,
    pub pants: Color,
    pub shoes: Color,
}

impl Outfit {
    pub fn colors(&self) -> [Color; 5] {
        [self.skin, self.hair, self.shirt, self.pants, self.shoes]
    }

    const fn hex(skin: u32, hair: u32, shirt: u32, pants: u32, shoes: u32) -> Self {
        Self {
            skin: rgb(skin),
            hair: rgb(hair),
            shirt: rgb(shirt),
            pants: rgb(pants),
            shoes: rgb(shoes),
        }
    }
}

const fn rgb(v: u32) -> Color {
    Color::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

const CURATED: [Outfit; 6] = [
    Outfit::hex(0xFFCC99, 0x553322, 0x4488CC, 0x334466, 0x222222),
    Outfit::hex(0xFFCC99, 0x8B4513, 0xCC4444, 0x443333, 0x1A1A1A),
    Outfit::hex(0xF5DEB3, 0x2F4F4F, 0x44AA66, 0x2D4A3E, 0x333333),
    Outfit::hex(0xDEB887, 0x1A1A2E, 0x9966CC, 0x3D2E5C, 0x2A2A2A),
    Outfit::hex(0xFFDAB9, 0xB8860B, 0xCCAA44, 0x5C4A22, 0x1A1A1A),
    Outfit::hex(0xFFE4C4, 0xA0522D, 0xCC7744, 0x4A3322, 0x222222),
];

/// Curated outfits plus the overflow rule, behind one lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteTable {
    curated: Vec<Outfit>,
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PaletteTable {
    pub fn standard() -> Self {
        Self {
            curated: CURATED.to_vec(),
        }
    }

    /// Custom table; falls back to the standard one when empty.
    pub fn new(curated: Vec<Outfit>) -> Self {
        if curated.is_empty() {
            Self::standard()
        } else {
            Self { curated }
        }
    }

    /// The master outfit the character art is drawn in.
    pub fn master(&self) -> Outfit {
        self.curated[0]
    }

    pub fn curated_len(&self) -> usize {
        self.curated.len()
    }

    /// Outfit for seat `index`. Indices past the curated table cycle through
    /// it with a hue rotation of `45 + ((i - n) * 60) % 270` degrees applied to
    /// hair, shirt and pants.
    pub fn get(&self, index: usize) -> Outfit {
        let n = self.curated.len();
        let base = self.curated[index % n];
        if index < n {
            return base;
        }
        let degrees = 45.0 + (((index - n) * 60) % 270) as f32;
        Outfit {
            hair: hue_shift(base.hair, degrees),
            shirt: hue_shift(base.shirt, degrees),
            pants: hue_shift(base.pants, degrees),
            ..base
        }
    }

    /// Recolor a master-outfit sprite for `seat`. Seat 0 is returned as-is.
    pub fn recolor_for_seat(&self, sprite: &PixelGrid, seat: usize) -> PixelGrid {
        if seat == 0 {
            return sprite.clone();
        }
        remap_palette(sprite, &self.master().colors(), &self.get(seat).colors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_entries() {
        let table = PaletteTable::standard();
        assert_eq!(table.get(0).shirt, Color::from_hex("#4488CC").unwrap());
        assert_eq!(table.get(5).hair, Color::from_hex("#A0522D").unwrap());
    }

    #[test]
    fn test_overflow_rotates_hue_keeps_skin() {
        let table = PaletteTable::standard();
        let seat6 = table.get(6);
        let base = table.get(0);
        assert_eq!(seat6.skin, base.skin);
        assert_eq!(seat6.shoes, base.shoes);
        assert_ne!(seat6.shirt, base.shirt);
        let (h0, _, _) = base.shirt.to_hsl();
        let (h6, _, _) = seat6.shirt.to_hsl();
        let delta = (h6 - h0).rem_euclid(360.0);
        assert!((delta - 45.0).abs() < 3.0, "rotated by {delta}");
    }

    #[test]
    fn test_overflow_is_deterministic_and_distinct() {
        let table = PaletteTable::standard();
        assert_eq!(table.get(7), table.get(7));
        assert_ne!(table.get(7), table.get(1));
        assert_ne!(table.get(6), table.get(12));
    }

    #[test]
    fn test_recolor_for_seat() {
        let table = PaletteTable::standard();
        let master = table.master();
        let other = Color::rgb(1, 2, 3);
        let sprite = PixelGrid::from_rows(&[vec![Some(master.shirt), Some(other), None]]);
        assert_eq!(table.recolor_for_seat(&sprite, 0), sprite);
        let out = table.recolor_for_seat(&sprite, 1);
        assert_eq!(out.get(0, 0), Some(table.get(1).shirt));
        assert_eq!(out.get(1, 0), Some(other));
    }
}
