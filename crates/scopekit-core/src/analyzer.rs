//! Single-pass frame analysis.
//!
//! One scan over the analysis frame derives everything the four scopes
//! need: luma per column (waveform), raw channel values per 3-pixel column
//! (parade), a decimated chroma sample set (vectorscope), and 256-bucket
//! histograms for R, G, B and luma.

use serde::{Deserialize, Serialize};

use crate::color::Rgb8;
use crate::error::FrameError;
use crate::frame::FrameView;

/// Default number of chroma points the vectorscope aims for per frame.
pub const DEFAULT_SAMPLE_BUDGET: usize = 50_000;

/// Source pixels folded into one parade column.
pub const PARADE_COLUMN_SPAN: u32 = 3;

/// Everything derived from one frame. Dropped after the cycle renders.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnalysis {
    /// Analysis width in pixels.
    pub width: u32,
    /// Analysis height in pixels.
    pub height: u32,
    /// Raster-index stride used to pick vectorscope samples.
    pub sample_stride: usize,
    pub waveform: WaveformColumns,
    pub parade: ParadeColumns,
    pub points: Vec<ColorPoint>,
    pub histogram: Histogram,
}

/// Luma values grouped by source column. Column-major, `height` values per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformColumns {
    height: u32,
    values: Vec<u8>,
}

impl WaveformColumns {
    fn new(width: u32, height: u32) -> Self {
        Self {
            height,
            values: vec![0; width as usize * height as usize],
        }
    }

    /// Number of columns (the analysis width).
    pub fn len(&self) -> usize {
        self.values.len() / self.height.max(1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Luma values of one column, top row first.
    pub fn column(&self, index: usize) -> &[u8] {
        let h = self.height as usize;
        self.values.get(index * h..(index + 1) * h).unwrap_or(&[])
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[u8]> {
        self.values.chunks_exact(self.height.max(1) as usize)
    }
}

/// Color channel selector for parade and histogram data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    /// Single-letter label.
    pub const fn letter(self) -> &'static str {
        match self {
            Self::Red => "R",
            Self::Green => "G",
            Self::Blue => "B",
        }
    }

    #[inline]
    pub fn pick(self, px: Rgb8) -> u8 {
        match self {
            Self::Red => px.r,
            Self::Green => px.g,
            Self::Blue => px.b,
        }
    }
}

/// Raw R, G, B values grouped into `floor(width / 3)` columns.
///
/// Each column holds `3 · height` values; pixels past the last full
/// 3-pixel group are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParadeColumns {
    column_count: u32,
    per_column: usize,
    channels: [Vec<u8>; 3],
}

impl ParadeColumns {
    fn new(width: u32, height: u32) -> Self {
        let column_count = width / PARADE_COLUMN_SPAN;
        let per_column = PARADE_COLUMN_SPAN as usize * height as usize;
        let total = column_count as usize * per_column;
        Self {
            column_count,
            per_column,
            channels: [vec![0; total], vec![0; total], vec![0; total]],
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_count as usize
    }

    /// Values of one column for one channel.
    pub fn column(&self, channel: Channel, index: usize) -> &[u8] {
        let n = self.per_column;
        self.channels[channel.index()]
            .get(index * n..(index + 1) * n)
            .unwrap_or(&[])
    }

    pub fn columns(&self, channel: Channel) -> impl ExactSizeIterator<Item = &[u8]> {
        self.channels[channel.index()].chunks_exact(self.per_column.max(1))
    }
}

/// One decimated vectorscope sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPoint {
    pub cb: f64,
    pub cr: f64,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// 256-bucket frequency tables for R, G, B and luma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub r: [u32; 256],
    pub g: [u32; 256],
    pub b: [u32; 256],
    pub lum: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            r: [0; 256],
            g: [0; 256],
            b: [0; 256],
            lum: [0; 256],
        }
    }
}

/// Exposure summary derived from the luma histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaSummary {
    pub mean: f64,
    /// Pixels at luma 0.
    pub crushed: u32,
    /// Pixels at luma 255.
    pub clipped: u32,
}

impl Histogram {
    pub fn channel(&self, channel: Channel) -> &[u32; 256] {
        match channel {
            Channel::Red => &self.r,
            Channel::Green => &self.g,
            Channel::Blue => &self.b,
        }
    }

    /// Tallest bucket across R, G and B (luma excluded), floored at 1.
    pub fn peak_rgb(&self) -> u32 {
        [&self.r, &self.g, &self.b]
            .iter()
            .flat_map(|ch| ch.iter())
            .copied()
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Number of pixels counted (sum of the luma table).
    pub fn total(&self) -> u64 {
        self.lum.iter().map(|&n| n as u64).sum()
    }

    pub fn luma_summary(&self) -> LumaSummary {
        let total = self.total();
        let weighted: u64 = self
            .lum
            .iter()
            .enumerate()
            .map(|(v, &n)| v as u64 * n as u64)
            .sum();
        LumaSummary {
            mean: if total == 0 {
                0.0
            } else {
                weighted as f64 / total as f64
            },
            crushed: self.lum[0],
            clipped: self.lum[255],
        }
    }
}

/// Raster-index stride that keeps roughly `budget` vectorscope samples.
pub fn sample_stride(pixel_count: usize, budget: usize) -> usize {
    (pixel_count / budget.max(1)).max(1)
}

/// Analyze a frame in one pass.
///
/// Deterministic: the same buffer and dimensions always produce identical
/// output. Chroma is only computed for pixels whose raster index is a
/// multiple of the sample stride.
pub fn analyze(view: &FrameView<'_>, sample_budget: usize) -> Result<FrameAnalysis, FrameError> {
    let (width, height) = (view.width(), view.height());
    if width == 0 || height == 0 {
        return Err(FrameError::EmptyFrame { width, height });
    }

    let pixel_count = view.pixel_count();
    let stride = sample_stride(pixel_count, sample_budget);
    let h = height as usize;

    let mut waveform = WaveformColumns::new(width, height);
    let mut parade = ParadeColumns::new(width, height);
    let mut points = Vec::with_capacity(pixel_count / stride + 1);
    let mut histogram = Histogram::default();

    let parade_columns = parade.column_count as usize;
    let per_column = parade.per_column;
    let span = PARADE_COLUMN_SPAN as usize;

    let (mut x, mut y) = (0usize, 0usize);
    for (idx, px) in view.samples().enumerate() {
        let lum = px.luminance();
        waveform.values[x * h + y] = lum;

        let parade_x = x / span;
        if parade_x < parade_columns {
            let slot = parade_x * per_column + y * span + x % span;
            parade.channels[0][slot] = px.r;
            parade.channels[1][slot] = px.g;
            parade.channels[2][slot] = px.b;
        }

        if idx % stride == 0 {
            let (cb, cr) = px.chroma();
            points.push(ColorPoint {
                cb,
                cr,
                r: px.r,
                g: px.g,
                b: px.b,
            });
        }

        histogram.r[px.r as usize] += 1;
        histogram.g[px.g as usize] += 1;
        histogram.b[px.b as usize] += 1;
        histogram.lum[lum as usize] += 1;

        x += 1;
        if x == width as usize {
            x = 0;
            y += 1;
        }
    }

    Ok(FrameAnalysis {
        width,
        height,
        sample_stride: stride,
        waveform,
        parade,
        points,
        histogram,
    })
}
