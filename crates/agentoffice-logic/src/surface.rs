//! CPU drawing surface.
//!
//! Coordinates passed to drawing calls are logical ("game") pixels. The
//! backing buffer is `pixel_ratio` times larger in each direction, matching a
//! high-density display. Sampling is always nearest-neighbour.

use crate::raster::{Color, PixelGrid};
use crate::sprites::{SpriteSheet, SpriteSource};

/// Options for [`Surface::blit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitOptions {
    /// Integer upscale of source pixels.
    pub scale: u32,
    /// Mirror left-to-right while drawing.
    pub flip: bool,
    /// Multiplies source alpha, 0–1.
    pub opacity: f32,
}

impl Default for BlitOptions {
    fn default() -> Self {
        Self {
            scale: crate::constants::SCALE,
            flip: false,
            opacity: 1.0,
        }
    }
}

impl BlitOptions {
    pub fn flipped(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixel_ratio: u32,
    /// Image smoothing; pixel art keeps this off.
    pub smoothing: bool,
    pixels: Vec<Color>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        let mut s = Self {
            width: 0,
            height: 0,
            pixel_ratio: 1,
            smoothing: false,
            pixels: Vec::new(),
        };
        s.resize(width, height, 1.0);
        s
    }

    /// Recompute the physical buffer from a container size and device pixel
    /// ratio. Contents are cleared and smoothing is disabled.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        let ratio = device_pixel_ratio.round().max(1.0) as u32;
        self.width = width;
        self.height = height;
        self.pixel_ratio = ratio;
        self.smoothing = false;
        let (pw, ph) = self.physical_size();
        self.pixels = vec![Color::TRANSPARENT; (pw * ph) as usize];
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> u32 {
        self.pixel_ratio
    }

    pub fn physical_size(&self) -> (u32, u32) {
        (self.width * self.pixel_ratio, self.height * self.pixel_ratio)
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Physical pixel at `(x, y)`.
    pub fn physical_pixel(&self, x: u32, y: u32) -> Option<Color> {
        let (pw, ph) = self.physical_size();
        if x >= pw || y >= ph {
            return None;
        }
        self.pixels.get((y * pw + x) as usize).copied()
    }

    /// Pixel at logical `(x, y)` (top-left physical sample).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.physical_pixel(x * self.pixel_ratio, y * self.pixel_ratio)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Color::TRANSPARENT);
    }

    /// Source-over blend of one physical pixel.
    fn blend(&mut self, px: i64, py: i64, src: Color, opacity: f32) {
        let (pw, ph) = self.physical_size();
        if px < 0 || py < 0 || px >= pw as i64 || py >= ph as i64 {
            return;
        }
        let idx = (py as u32 * pw + px as u32) as usize;
        let a = (src.a as f32 / 255.0) * opacity.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = self.pixels[idx];
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        let out_a = a + (dst.a as f32 / 255.0) * (1.0 - a);
        self.pixels[idx] = Color::rgba(
            mix(src.r, dst.r),
            mix(src.g, dst.g),
            mix(src.b, dst.b),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        );
    }

    /// Alpha-blended rectangle fill in logical pixels.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let r = self.pixel_ratio as f32;
        let x0 = (x * r).floor() as i64;
        let y0 = (y * r).floor() as i64;
        let x1 = ((x + w) * r).ceil() as i64;
        let y1 = ((y + h) * r).ceil() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, 1.0);
            }
        }
    }

    /// Draw `sprite` with its top-left at logical `(x, y)`, each source pixel
    /// covering `scale × scale` logical pixels. Transparent pixels are skipped.
    pub fn blit(&mut self, sprite: &PixelGrid, x: i32, y: i32, opts: BlitOptions) {
        let dw = sprite.width as u32 * opts.scale;
        let dh = sprite.height as u32 * opts.scale;
        self.blit_sized(sprite, x, y, dw, dh, opts);
    }

    /// Draw `sprite` stretched to a `dw × dh` logical rectangle.
    pub fn blit_sized(&mut self, sprite: &PixelGrid, x: i32, y: i32, dw: u32, dh: u32, opts: BlitOptions) {
        if sprite.width == 0 || sprite.height == 0 || dw == 0 || dh == 0 {
            return;
        }
        let r = self.pixel_ratio as i64;
        let (pdw, pdh) = (dw as i64 * r, dh as i64 * r);
        let (ox, oy) = (x as i64 * r, y as i64 * r);
        for py in 0..pdh {
            let sy = (py * sprite.height as i64 / pdh) as usize;
            for px in 0..pdw {
                let mut sx = (px * sprite.width as i64 / pdw) as usize;
                if opts.flip {
                    sx = sprite.width - 1 - sx;
                }
                if let Some(c) = sprite.get(sx, sy) {
                    self.blend(ox + px, oy + py, c, opts.opacity);
                }
            }
        }
    }

    /// Draw a resolved sprite. Sheet references render at their display size;
    /// pixel grids use `opts.scale`. Returns `false` when a sheet reference has
    /// no sheet to read from.
    pub fn blit_source(
        &mut self,
        sheet: Option<&SpriteSheet>,
        source: &SpriteSource,
        x: i32,
        y: i32,
        opts: BlitOptions,
    ) -> bool {
        match source {
            SpriteSource::Grid(grid) => {
                self.blit(grid, x, y, opts);
                true
            }
            SpriteSource::Sheet(r) => {
                let Some(sheet) = sheet else {
                    return false;
                };
                let grid = sheet.extract(r);
                self.blit_sized(&grid, x, y, r.dw, r.dh, opts);
                true
            }
        }
    }
}
