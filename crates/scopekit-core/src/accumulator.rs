//! Phosphor-style intensity accumulation shared by the waveform, parade,
//! and vectorscope renderers.
//!
//! Renderers plot every data point into an [`IntensityMap`], then
//! normalize the counts against the busiest cell and map them through a
//! [`ColorRamp`]. Sparse traces get a uniform `gain` boost so single hits
//! stay visible next to dense clusters.

use palette::{LinSrgb, Mix, Srgb};

use crate::raster::{Raster, Rgb};

/// Grid of hit counters, reused across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntensityMap {
    width: u32,
    height: u32,
    counts: Vec<u32>,
}

impl IntensityMap {
    /// Create a zeroed map.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            counts: vec![0; width as usize * height as usize],
        }
    }

    /// Resize to `width × height` and zero every counter, keeping the allocation.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.counts.clear();
        self.counts.resize(width as usize * height as usize, 0);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Counter at `(x, y)`; zero outside the grid.
    pub fn get(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.counts[y as usize * self.width as usize + x as usize]
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Increment one cell. Coordinates outside the grid are ignored.
    #[inline]
    pub fn plot(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    /// Increment the `(2·radius + 1)²` neighborhood around `(x, y)`.
    pub fn stamp(&mut self, x: i64, y: i64, radius: u32) {
        let r = radius as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                self.plot(x + dx, y + dy);
            }
        }
    }

    /// Largest counter, floored at 1 so normalization never divides by zero.
    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0).max(1)
    }

    /// Number of cells with at least one hit.
    pub fn lit_cells(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Normalized intensity of one counter: `min(1, count / max · gain)`.
    #[inline]
    pub fn intensity(count: u32, max_count: u32, gain: f32) -> f32 {
        (count as f32 / max_count.max(1) as f32 * gain).min(1.0)
    }

    /// Paint every non-zero cell into `target` at `origin`, colored by `ramp`.
    ///
    /// Empty cells are left untouched, so whatever is already on the
    /// raster (background, under-layer graticule) shows through.
    pub fn normalize_and_colorize(
        &self,
        target: &mut Raster,
        origin: (u32, u32),
        gain: f32,
        ramp: &ColorRamp,
    ) {
        let max_count = self.max_count();
        let (ox, oy) = (origin.0 as i32, origin.1 as i32);
        for (idx, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let x = (idx % self.width as usize) as i32;
            let y = (idx / self.width as usize) as i32;
            let color = ramp.color(Self::intensity(count, max_count, gain));
            target.put(ox + x, oy + y, color);
        }
    }
}

/// Maps normalized intensity `[0, 1]` to a phosphor color.
///
/// Built once from a dim and a bright endpoint mixed in linear light,
/// with a gamma lift so faint traces read above the background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRamp {
    lut: [Rgb; 256],
}

/// Gamma applied to intensity before mixing; < 1 lifts faint hits.
const RAMP_GAMMA: f32 = 0.65;

impl ColorRamp {
    /// Ramp from `low` to `high` (both sRGB 8-bit).
    pub fn new(low: Rgb, high: Rgb) -> Self {
        let low: LinSrgb = Srgb::new(low[0], low[1], low[2]).into_format::<f32>().into_linear();
        let high: LinSrgb = Srgb::new(high[0], high[1], high[2]).into_format::<f32>().into_linear();

        let mut lut = [[0u8; 3]; 256];
        for (i, slot) in lut.iter_mut().enumerate() {
            let t = (i as f32 / 255.0).powf(RAMP_GAMMA);
            let mixed: Srgb<f32> = Srgb::from_linear(low.mix(high, t));
            let mixed: Srgb<u8> = mixed.into_format();
            *slot = [mixed.red, mixed.green, mixed.blue];
        }
        Self { lut }
    }

    /// Color for an intensity; values outside `[0, 1]` are clamped.
    #[inline]
    pub fn color(&self, intensity: f32) -> Rgb {
        let i = (intensity.clamp(0.0, 1.0) * 255.0).round() as usize;
        self.lut[i]
    }

    /// Green phosphor with a faint red/blue tint.
    pub fn waveform() -> Self {
        Self::new([4, 24, 8], [150, 255, 160])
    }

    /// Red-dominant parade channel.
    pub fn parade_red() -> Self {
        Self::new([28, 4, 4], [255, 90, 80])
    }

    /// Green-dominant parade channel.
    pub fn parade_green() -> Self {
        Self::new([4, 28, 4], [90, 255, 100])
    }

    /// Blue-dominant parade channel.
    pub fn parade_blue() -> Self {
        Self::new([4, 8, 32], [100, 140, 255])
    }

    /// Cyan/green phosphor for the vectorscope.
    pub fn vectorscope() -> Self {
        Self::new([4, 24, 20], [170, 255, 230])
    }
}
