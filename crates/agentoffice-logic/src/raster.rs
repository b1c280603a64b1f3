//! Raster primitives: colors, indexed pixel grids, flipping, palette remap
//! and hue/saturation tinting.
//!
//! Everything here is pure. The only side-effecting operation, blitting onto
//! a framebuffer, lives in [`crate::surface`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// RGBA8 color. Serializes as `#RRGGBB` (or `#RRGGBBAA` when not opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color '{}'", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`; the leading `#` is optional and
    /// digits are case-insensitive.
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let err = || ParseColorError(s.to_string());
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0 * 360.0, s, l)
    }

    /// Opaque color from HSL. Hue in degrees, saturation/lightness in `[0, 1]`.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h / 360.0;
        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };
        Self::rgb(to_byte(r * 255.0), to_byte(g * 255.0), to_byte(b * 255.0))
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Rotate a color's hue, keeping saturation, lightness and alpha.
pub fn hue_shift(color: Color, degrees: f32) -> Color {
    let (h, s, l) = color.to_hsl();
    let h = (h + degrees).rem_euclid(360.0);
    Color::from_hsl(h, s, l).with_alpha(color.a)
}

/// A small indexed sprite: row-major, `None` = transparent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelGrid {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Option<Color>>,
}

impl PixelGrid {
    /// Fully transparent grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![Some(color); width * height],
        }
    }

    /// Build from rows of optional colors; short rows pad with transparency.
    pub fn from_rows(rows: &[Vec<Option<Color>>]) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, px) in row.iter().enumerate() {
                grid.pixels[y * width + x] = *px;
            }
        }
        grid
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, color: Option<Color>) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Apply `f` to every opaque pixel.
    pub fn map_colors(&self, mut f: impl FnMut(Color) -> Color) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|p| p.map(&mut f)).collect(),
        }
    }
}

/// Mirror a sprite left-to-right.
pub fn flip_horizontal(sprite: &PixelGrid) -> PixelGrid {
    let mut out = PixelGrid::new(sprite.width, sprite.height);
    for y in 0..sprite.height {
        for x in 0..sprite.width {
            out.set(sprite.width - 1 - x, y, sprite.get(x, y));
        }
    }
    out
}

/// Replace every pixel exactly matching `from[i]` with `to[i]`. Colors not in
/// `from` are left untouched; surplus entries in the longer slice are ignored.
pub fn remap_palette(sprite: &PixelGrid, from: &[Color], to: &[Color]) -> PixelGrid {
    let map: HashMap<Color, Color> = from.iter().copied().zip(to.iter().copied()).collect();
    sprite.map_colors(|c| map.get(&c).copied().unwrap_or(c))
}

/// Parameters for [`colorize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tint {
    /// Target hue in degrees.
    pub hue: f32,
    /// Saturation, 0–100.
    pub saturation: f32,
    /// Luminance contrast multiplier around mid-grey.
    pub contrast: f32,
    /// Lightness offset, -100..100 (halved before use).
    pub brightness: f32,
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 50.0,
            contrast: 1.0,
            brightness: 0.0,
        }
    }
}

impl Tint {
    pub fn new(hue: f32, saturation: f32, contrast: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            contrast,
            brightness,
        }
    }

    fn apply(&self, c: Color) -> Color {
        let lum = (0.299 * c.r as f32 + 0.587 * c.g as f32 + 0.114 * c.b as f32) / 255.0;
        let lum = 0.5 + (lum - 0.5) * self.contrast;
        let lum = (lum + self.brightness / 200.0).clamp(0.0, 1.0);
        Color::from_hsl(self.hue, self.saturation / 100.0, lum).with_alpha(c.a)
    }
}

/// Recolor a greyscale (or single-hue) sprite to an arbitrary hue by luminance.
pub fn colorize(sprite: &PixelGrid, tint: Tint) -> PixelGrid {
    sprite.map_colors(|c| tint.apply(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(hex: &str) -> Color {
        Color::from_hex(hex).unwrap()
    }

    #[test]
    fn test_hex_roundtrip_and_case() {
        assert_eq!(c("#4488cc"), c("#4488CC"));
        assert_eq!(c("4488CC").to_hex(), "#4488CC");
        assert_eq!(c("#11223344").a, 0x44);
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_color_string_conversions() {
        assert_eq!(String::from(c("#ff8000")), "#FF8000");
        assert_eq!(Color::try_from("#80FF0080".to_string()), Ok(Color::rgba(0x80, 0xFF, 0, 0x80)));
        assert!(Color::try_from("red".to_string()).is_err());
    }

    #[test]
    fn test_hsl_primaries() {
        let (h, s, l) = c("#FF0000").to_hsl();
        assert_eq!((h, s, l), (0.0, 1.0, 0.5));
        let (h, _, _) = c("#00FF00").to_hsl();
        assert!((h - 120.0).abs() < 0.01);
        assert_eq!(Color::from_hsl(240.0, 1.0, 0.5), c("#0000FF"));
        assert_eq!(Color::from_hsl(0.0, 0.0, 0.6), c("#999999"));
    }

    #[test]
    fn test_hue_shift() {
        assert_eq!(hue_shift(c("#FF0000"), 120.0), c("#00FF00"));
        assert_eq!(hue_shift(c("#FF0000"), -120.0), c("#0000FF"));
        // Greys have no hue to rotate
        assert_eq!(hue_shift(c("#777777"), 90.0), c("#777777"));
    }

    #[test]
    fn test_flip_horizontal() {
        let a = Some(c("#FF0000"));
        let b = Some(c("#00FF00"));
        let sprite = PixelGrid::from_rows(&[vec![a, None, b], vec![None, a, None]]);
        let flipped = flip_horizontal(&sprite);
        assert_eq!(flipped.get(0, 0), b);
        assert_eq!(flipped.get(1, 0), None);
        assert_eq!(flipped.get(2, 0), a);
        assert_eq!(flipped.get(1, 1), a);
        assert_eq!(flip_horizontal(&flipped), sprite);
    }

    #[test]
    fn test_remap_palette_exact_match_only() {
        let shirt = c("#4488CC");
        let other = c("#4488CD");
        let sprite = PixelGrid::from_rows(&[vec![Some(shirt), Some(other), None]]);
        let out = remap_palette(&sprite, &[shirt], &[c("#CC4444")]);
        assert_eq!(out.get(0, 0), Some(c("#CC4444")));
        assert_eq!(out.get(1, 0), Some(other));
        assert_eq!(out.get(2, 0), None);
    }

    #[test]
    fn test_colorize_keeps_transparency_and_luminance_order() {
        let sprite = PixelGrid::from_rows(&[vec![Some(c("#999999")), Some(c("#555555")), None]]);
        let out = colorize(&sprite, Tint::new(220.0, 15.0, 1.1, -10.0));
        assert_eq!(out.get(2, 0), None);
        let (h, s, light) = out.get(0, 0).unwrap().to_hsl();
        let (_, _, dark) = out.get(1, 0).unwrap().to_hsl();
        assert!((h - 220.0).abs() < 5.0);
        assert!((s - 0.15).abs() < 0.03);
        assert!(light > dark);
    }

    #[test]
    fn test_colorize_clamps_lightness() {
        let sprite = PixelGrid::filled(1, 1, Color::WHITE);
        let out = colorize(&sprite, Tint::new(0.0, 0.0, 3.0, 100.0));
        assert_eq!(out.get(0, 0), Some(Color::WHITE));
    }
}
