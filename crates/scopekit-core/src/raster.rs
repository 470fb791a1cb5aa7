//! Opaque RGBA raster with the small set of clipped drawing primitives
//! scope overlays need.
//!
//! Every primitive silently skips pixels outside the canvas. Writes are
//! either opaque or a fixed-alpha blend; nothing reads back prior overlay
//! state, so repeating a draw call over the same pixels is stable for
//! opaque marks.

use image::{Rgba, RgbaImage};

use crate::font;

/// An RGB color used by drawing primitives.
pub type Rgb = [u8; 3];

/// Scope output image. Alpha is always 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Create a raster filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let mut raster = Self {
            image: RgbaImage::new(width, height),
        };
        raster.fill(background);
        raster
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn fill(&mut self, color: Rgb) {
        let px: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut *self.image);
        px.fill([color[0], color[1], color[2], 255]);
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height()
    }

    /// Write an opaque pixel.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if self.in_bounds(x, y) {
            self.image
                .put_pixel(x as u32, y as u32, Rgba([color[0], color[1], color[2], 255]));
        }
    }

    /// Alpha-blend `color` over the existing pixel. Result stays opaque.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            let mixed = color[c] as f32 * a + dst.0[c] as f32 * (1.0 - a);
            dst.0[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
        dst.0[3] = 255;
    }

    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Rgb) {
        let (a, b) = ordered(x0, x1);
        for x in a..=b {
            self.put(x, y, color);
        }
    }

    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Rgb) {
        let (a, b) = ordered(y0, y1);
        for y in a..=b {
            self.put(x, y, color);
        }
    }

    /// Vertical line drawn as `dash` on / `gap` off segments.
    pub fn dashed_vline(&mut self, x: i32, y0: i32, y1: i32, dash: u32, gap: u32, color: Rgb) {
        let (a, b) = ordered(y0, y1);
        let period = (dash + gap).max(1) as i32;
        for y in a..=b {
            if (y - a) % period < dash as i32 {
                self.put(x, y, color);
            }
        }
    }

    /// Bresenham line between two points.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        self.dashed_line(x0, y0, x1, y1, u32::MAX, 0, color);
    }

    /// Bresenham line with a `dash` on / `gap` off pattern measured in steps.
    #[allow(clippy::too_many_arguments)]
    pub fn dashed_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        dash: u32,
        gap: u32,
        color: Rgb,
    ) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let period = dash.saturating_add(gap).max(1) as u64;

        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        let mut step = 0u64;
        loop {
            if step % period < dash as u64 {
                self.put(x, y, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1;
        }
    }

    /// One-pixel circle outline centered on a sub-pixel position.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        if radius <= 0.0 {
            self.put(cx.round() as i32, cy.round() as i32, color);
            return;
        }
        let steps = (std::f32::consts::TAU * radius * 2.0).ceil().max(8.0) as u32;
        for i in 0..steps {
            let theta = i as f32 / steps as f32 * std::f32::consts::TAU;
            let x = cx + radius * theta.cos();
            let y = cy + radius * theta.sin();
            self.put(x.round() as i32, y.round() as i32, color);
        }
    }

    pub fn rect_outline(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb) {
        if w == 0 || h == 0 {
            return;
        }
        let (x1, y1) = (x + w as i32 - 1, y + h as i32 - 1);
        self.hline(x, x1, y, color);
        self.hline(x, x1, y1, color);
        self.vline(x, y, y1, color);
        self.vline(x1, y, y1, color);
    }

    /// Blend a filled rectangle at a fixed alpha.
    pub fn blend_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb, alpha: f32) {
        for yy in y..y + h as i32 {
            for xx in x..x + w as i32 {
                self.blend(xx, yy, color, alpha);
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Unknown glyphs render blank.
    pub fn text(&mut self, x: i32, y: i32, text: &str, color: Rgb) {
        for (i, ch) in text.chars().enumerate() {
            let Some(rows) = font::glyph(ch) else {
                continue;
            };
            let gx = x + (i as u32 * font::ADVANCE) as i32;
            for row in 0..font::GLYPH_H {
                for col in 0..font::GLYPH_W {
                    if font::is_set(rows, col, row) {
                        self.put(gx + col as i32, y + row as i32, color);
                    }
                }
            }
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Packed RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }
}

#[inline]
fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = [255, 255, 255];

    #[test]
    fn test_new_is_opaque_background() {
        let r = Raster::new(3, 2, [1, 2, 3]);
        assert!(r.as_bytes().chunks_exact(4).all(|p| p == [1, 2, 3, 255]));
    }

    #[test]
    fn test_put_clips_silently() {
        let mut r = Raster::new(2, 2, [0, 0, 0]);
        r.put(-1, 0, WHITE);
        r.put(0, 5, WHITE);
        r.put(1, 1, WHITE);
        assert_eq!(r.get(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(r.get(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_blend_half() {
        let mut r = Raster::new(1, 1, [0, 0, 0]);
        r.blend(0, 0, [200, 100, 0], 0.5);
        assert_eq!(r.get(0, 0), Some([100, 50, 0, 255]));
    }

    #[test]
    fn test_line_endpoints() {
        let mut r = Raster::new(10, 10, [0, 0, 0]);
        r.line(1, 1, 8, 5, WHITE);
        assert_eq!(r.get(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(r.get(8, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_dashed_vline_has_gaps() {
        let mut r = Raster::new(1, 8, [0, 0, 0]);
        r.dashed_vline(0, 0, 7, 2, 2, WHITE);
        let lit: Vec<bool> = (0..8).map(|y| r.get(0, y).unwrap()[0] == 255).collect();
        assert_eq!(lit, vec![true, true, false, false, true, true, false, false]);
    }

    #[test]
    fn test_text_draws_pixels() {
        let mut r = Raster::new(20, 10, [0, 0, 0]);
        r.text(0, 0, "R", WHITE);
        let lit = r.as_bytes().chunks_exact(4).filter(|p| p[0] == 255).count();
        assert!(lit > 5);
    }
}
