//! Frame input: borrowed pixel views, crop regions, and analysis-size preparation.
//!
//! A capture source hands the pipeline a packed 8-bit RGB or RGBA buffer.
//! Before analysis the frame is optionally cropped to a normalized region
//! and downscaled so its width never exceeds the analysis cap.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::color::{Rgb8, Rgba8};
use crate::error::FrameError;

/// Smallest crop edge in pixels. Degenerate regions are grown to this.
pub const MIN_CROP_PIXELS: u32 = 10;

/// Channel layout of a packed 8-bit pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pixels<'a> {
    Rgb(&'a [Rgb8]),
    Rgba(&'a [Rgba8]),
}

/// A validated, borrowed, row-major pixel buffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    width: u32,
    height: u32,
    pixels: Pixels<'a>,
}

impl<'a> FrameView<'a> {
    /// Wrap a raw buffer, checking it holds exactly `width · height` pixels.
    pub fn new(
        pixels: &'a [u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyFrame { width, height });
        }
        if pixels.is_empty() {
            return Err(FrameError::EmptyBuffer);
        }

        let channels = layout.channels();
        let expected = width as usize * height as usize * channels;
        if pixels.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                channels,
                expected,
                actual: pixels.len(),
            });
        }

        // Lengths are checked above and both sample types have alignment 1.
        let pixels = match layout {
            PixelLayout::Rgb => Pixels::Rgb(bytemuck::cast_slice(pixels)),
            PixelLayout::Rgba => Pixels::Rgba(bytemuck::cast_slice(pixels)),
        };

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn layout(&self) -> PixelLayout {
        match self.pixels {
            Pixels::Rgb(_) => PixelLayout::Rgb,
            Pixels::Rgba(_) => PixelLayout::Rgba,
        }
    }

    /// Row-major iterator over every sample, alpha dropped.
    pub fn samples(&self) -> Samples<'a> {
        match self.pixels {
            Pixels::Rgb(px) => Samples::Rgb(px.iter()),
            Pixels::Rgba(px) => Samples::Rgba(px.iter()),
        }
    }

    /// Sample at `(x, y)`, or `None` outside the frame.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        match self.pixels {
            Pixels::Rgb(px) => px.get(idx).copied(),
            Pixels::Rgba(px) => px.get(idx).map(|p| Rgb8::from(*p)),
        }
    }
}

/// Iterator returned by [`FrameView::samples`].
pub enum Samples<'a> {
    Rgb(std::slice::Iter<'a, Rgb8>),
    Rgba(std::slice::Iter<'a, Rgba8>),
}

impl Iterator for Samples<'_> {
    type Item = Rgb8;

    #[inline]
    fn next(&mut self) -> Option<Rgb8> {
        match self {
            Self::Rgb(it) => it.next().copied(),
            Self::Rgba(it) => it.next().map(|p| Rgb8::from(*p)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Rgb(it) => it.size_hint(),
            Self::Rgba(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for Samples<'_> {}

/// An owned frame, as handed between producer and consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedFrame {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub data: Vec<u8>,
}

impl OwnedFrame {
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            layout,
            data,
        }
    }

    /// Fill a frame with one color.
    pub fn solid(width: u32, height: u32, color: Rgb8) -> Self {
        let data = [color.r, color.g, color.b].repeat(width as usize * height as usize);
        Self::new(width, height, PixelLayout::Rgb, data)
    }

    /// Validated view over this frame's pixels.
    pub fn view(&self) -> Result<FrameView<'_>, FrameError> {
        FrameView::new(&self.data, self.width, self.height, self.layout)
    }
}

impl From<RgbaImage> for OwnedFrame {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, PixelLayout::Rgba, img.into_raw())
    }
}

impl From<DynamicImage> for OwnedFrame {
    fn from(img: DynamicImage) -> Self {
        Self::from(img.to_rgba8())
    }
}

/// Normalized crop rectangle; every field is a fraction of the frame in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Default for CropRegion {
    fn default() -> Self {
        Self::FULL
    }
}

/// Crop rectangle in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// The whole frame.
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Clamp the origin into `[0, 1]` and the extent so it stays inside the frame.
    /// NaN components collapse to zero.
    pub fn clamped(self) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        let x = unit(self.x);
        let y = unit(self.y);
        Self {
            x,
            y,
            w: unit(self.w).min(1.0 - x),
            h: unit(self.h).min(1.0 - y),
        }
    }

    /// Resolve against a frame, growing degenerate regions to
    /// [`MIN_CROP_PIXELS`] and shifting them back inside the frame.
    pub fn to_pixel_rect(self, frame_width: u32, frame_height: u32) -> PixelRect {
        let c = self.clamped();
        let (x, width) = resolve_axis(c.x, c.w, frame_width);
        let (y, height) = resolve_axis(c.y, c.h, frame_height);
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }
}

fn resolve_axis(origin: f32, extent: f32, len: u32) -> (u32, u32) {
    let min = MIN_CROP_PIXELS.min(len);
    let size = ((extent * len as f32).round() as u32).clamp(min, len);
    let start = ((origin * len as f32).floor() as u32).min(len - size);
    (start, size)
}

/// Crop (optional) and downscale a frame to the analysis resolution.
///
/// Output is always packed RGBA. Frames no wider than `max_width` keep their
/// size; `max_width == 0` disables the cap. Downscaling preserves aspect.
pub fn prepare(
    view: &FrameView<'_>,
    crop: Option<CropRegion>,
    max_width: u32,
) -> Result<OwnedFrame, FrameError> {
    let rect = match crop {
        Some(region) => region.to_pixel_rect(view.width(), view.height()),
        None => PixelRect {
            x: 0,
            y: 0,
            width: view.width(),
            height: view.height(),
        },
    };

    let cropped = RgbaImage::from_fn(rect.width, rect.height, |x, y| {
        let px = view.get(rect.x + x, rect.y + y).unwrap_or_default();
        image::Rgba([px.r, px.g, px.b, 255])
    });

    let out = if max_width > 0 && rect.width > max_width {
        let scaled_height = ((rect.height as u64 * max_width as u64) as f64 / rect.width as f64)
            .round()
            .max(1.0) as u32;
        imageops::resize(&cropped, max_width, scaled_height, FilterType::Triangle)
    } else {
        cropped
    };

    let frame = OwnedFrame::from(out);
    // Re-validate so a zero-sized resample is rejected rather than analyzed.
    frame.view()?;
    Ok(frame)
}
