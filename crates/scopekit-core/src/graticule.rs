//! Calibration overlays (graticules) for the waveform, parade, and vectorscope.
//!
//! Drawing depends only on the raster size and the overlay kind, never on
//! frame data. Every mark is written opaque with a fixed color, so the
//! renderers call [`draw`] once under the signal and once over it and both
//! passes produce identical overlay pixels.

use glam::Vec2;

use crate::analyzer::Channel;
use crate::font;
use crate::raster::{Raster, Rgb};

/// Which overlay to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraticuleKind {
    Waveform,
    Parade,
    Vectorscope,
}

/// Brightness levels (percent of full scale) marked on linear scopes.
pub const LEVELS: [u32; 5] = [0, 25, 50, 75, 100];

const LINE: Rgb = [58, 62, 60];
const LABEL: Rgb = [150, 156, 152];
const SEPARATOR: Rgb = [90, 90, 96];
const SKIN: Rgb = [214, 160, 120];

/// Fraction of the radius at which color targets sit.
pub const TARGET_RADIUS: f32 = 0.9;

/// Angle of the skin-tone reference ray, degrees counter-clockwise from +Cb.
pub const SKIN_ANGLE_DEG: f32 = 123.0;

/// A vectorscope color target: where a fully saturated primary or
/// secondary lands on the Cb/Cr plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTarget {
    pub label: &'static str,
    /// Degrees counter-clockwise from the +Cb axis.
    pub angle_deg: f32,
    /// Fraction of the scope radius.
    pub radius: f32,
    pub color: Rgb,
}

/// Targets for R, Mg, B, Cy, G, Yl.
pub const COLOR_TARGETS: [ColorTarget; 6] = [
    ColorTarget { label: "R", angle_deg: 108.6, radius: TARGET_RADIUS, color: [235, 64, 64] },
    ColorTarget { label: "Mg", angle_deg: 51.6, radius: TARGET_RADIUS, color: [228, 70, 228] },
    ColorTarget { label: "B", angle_deg: 350.8, radius: TARGET_RADIUS, color: [88, 96, 240] },
    ColorTarget { label: "Cy", angle_deg: 288.6, radius: TARGET_RADIUS, color: [70, 220, 228] },
    ColorTarget { label: "G", angle_deg: 231.6, radius: TARGET_RADIUS, color: [70, 226, 80] },
    ColorTarget { label: "Yl", angle_deg: 170.8, radius: TARGET_RADIUS, color: [226, 220, 70] },
];

/// Circular plot area inside a (possibly non-square) canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarGeometry {
    pub center: Vec2,
    pub radius: f32,
}

impl PolarGeometry {
    /// Largest circle that fits the canvas, with one pixel of margin.
    pub fn fit(width: u32, height: u32) -> Self {
        let diameter = width.min(height) as f32;
        Self {
            center: Vec2::new((width as f32 - 1.0) * 0.5, (height as f32 - 1.0) * 0.5),
            radius: (diameter * 0.5 - 1.0).max(1.0),
        }
    }

    /// Canvas position of a unit-plane point (`+x` right, `+y` up).
    #[inline]
    pub fn to_canvas(&self, unit: Vec2) -> Vec2 {
        Vec2::new(
            self.center.x + unit.x * self.radius,
            self.center.y - unit.y * self.radius,
        )
    }

    /// Canvas position at `angle_deg`, `fraction` of the radius out.
    pub fn polar(&self, angle_deg: f32, fraction: f32) -> Vec2 {
        let dir = Vec2::from_angle(angle_deg.to_radians());
        self.to_canvas(dir * fraction)
    }
}

/// Row for a level given as a fraction of full scale (0 = bottom).
#[inline]
pub fn level_row(fraction: f32, height: u32) -> i32 {
    let span = height.saturating_sub(1) as f32;
    (span - fraction * span).floor() as i32
}

/// Draw the overlay for `kind` across the whole raster.
pub fn draw(raster: &mut Raster, kind: GraticuleKind) {
    match kind {
        GraticuleKind::Waveform => draw_levels(raster),
        GraticuleKind::Parade => {
            draw_levels(raster);
            draw_parade_regions(raster);
        }
        GraticuleKind::Vectorscope => draw_vectorscope(raster),
    }
}

fn draw_levels(raster: &mut Raster) {
    let (w, h) = (raster.width() as i32, raster.height());
    for level in LEVELS {
        let y = level_row(level as f32 / 100.0, h);
        raster.hline(0, w - 1, y, LINE);

        let label = format!("{level}%");
        let label_y = if y >= font::GLYPH_H as i32 + 2 {
            y - font::GLYPH_H as i32 - 1
        } else {
            y + 2
        };
        raster.text(2, label_y, &label, LABEL);
    }
}

fn draw_parade_regions(raster: &mut Raster) {
    let h = raster.height() as i32;
    let panel = raster.width() / 3;
    for i in 1..3 {
        raster.dashed_vline((panel * i) as i32, 0, h - 1, 4, 3, SEPARATOR);
    }
    for (i, channel) in Channel::ALL.iter().enumerate() {
        let color = match channel {
            Channel::Red => [220, 80, 80],
            Channel::Green => [80, 210, 90],
            Channel::Blue => [96, 120, 240],
        };
        let letter = channel.letter();
        let x = (panel * (i as u32 + 1)) as i32 - font::text_width(letter) as i32 - 3;
        raster.text(x, 2, letter, color);
    }
}

fn draw_vectorscope(raster: &mut Raster) {
    let geo = PolarGeometry::fit(raster.width(), raster.height());
    let c = geo.center;

    for ring in [0.25, 0.5, 0.75, 1.0] {
        raster.circle(c.x, c.y, geo.radius * ring, LINE);
    }

    let left = geo.to_canvas(Vec2::new(-1.0, 0.0)).round();
    let right = geo.to_canvas(Vec2::new(1.0, 0.0)).round();
    let top = geo.to_canvas(Vec2::new(0.0, 1.0)).round();
    let bottom = geo.to_canvas(Vec2::new(0.0, -1.0)).round();
    raster.hline(left.x as i32, right.x as i32, c.y.round() as i32, LINE);
    raster.vline(c.x.round() as i32, top.y as i32, bottom.y as i32, LINE);

    let box_size = (geo.radius * 0.08).round().max(5.0) as u32;
    for target in COLOR_TARGETS {
        let p = geo.polar(target.angle_deg, target.radius).round();
        let half = (box_size / 2) as i32;
        raster.rect_outline(p.x as i32 - half, p.y as i32 - half, box_size, box_size, target.color);

        // Label sits just outside the box, pushed away from the center.
        let outward = Vec2::from_angle(target.angle_deg.to_radians());
        let offset = Vec2::new(outward.x, -outward.y) * (box_size as f32 + 4.0);
        let anchor = p + offset;
        let tw = font::text_width(target.label) as f32;
        raster.text(
            (anchor.x - tw * 0.5).round() as i32,
            (anchor.y - font::GLYPH_H as f32 * 0.5).round() as i32,
            target.label,
            target.color,
        );
    }

    let tip = geo.polar(SKIN_ANGLE_DEG, 1.0).round();
    raster.dashed_line(
        c.x.round() as i32,
        c.y.round() as i32,
        tip.x as i32,
        tip.y as i32,
        4,
        3,
        SKIN,
    );
    let label_at = geo.polar(SKIN_ANGLE_DEG, 0.62).round();
    raster.text(label_at.x as i32 + 4, label_at.y as i32 - font::GLYPH_H as i32, "skin", SKIN);
}
