//! Broadcast color math: Rec. 709 luma and Y'CbCr chroma on 8-bit samples.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Rec. 709 luma weight for red.
pub const LUMA_R: f64 = 0.2126;
/// Rec. 709 luma weight for green.
pub const LUMA_G: f64 = 0.7152;
/// Rec. 709 luma weight for blue.
pub const LUMA_B: f64 = 0.0722;

/// Neutral chroma value (zero color difference) on the 8-bit scale.
pub const CHROMA_CENTER: f64 = 128.0;

/// Cb weights for R, G, B.
const CB_WEIGHTS: [f64; 3] = [-0.168736, -0.331264, 0.5];
/// Cr weights for R, G, B.
const CR_WEIGHTS: [f64; 3] = [0.5, -0.418688, -0.081312];

/// A single 8-bit RGB sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A single 8-bit RGBA sample. Alpha is carried but never analyzed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rec. 709 luma of this sample.
    #[inline]
    pub fn luminance(self) -> u8 {
        luminance(self.r, self.g, self.b)
    }

    /// `(cb, cr)` chroma of this sample.
    #[inline]
    pub fn chroma(self) -> (f64, f64) {
        chroma(self.r, self.g, self.b)
    }
}

impl From<Rgba8> for Rgb8 {
    #[inline]
    fn from(px: Rgba8) -> Self {
        Self::new(px.r, px.g, px.b)
    }
}

/// Rec. 709 luma: `round(0.2126·r + 0.7152·g + 0.0722·b)`.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64;
    y.round().clamp(0.0, 255.0) as u8
}

/// Blue-difference and red-difference chroma centered on 128.
///
/// Values are not clamped; saturated primaries land slightly outside
/// `[0, 255]` and the vectorscope lets them fall off the grid.
#[inline]
pub fn chroma(r: u8, g: u8, b: u8) -> (f64, f64) {
    let rgb = [r as f64, g as f64, b as f64];
    let cb = CHROMA_CENTER + dot(CB_WEIGHTS, rgb);
    let cr = CHROMA_CENTER + dot(CR_WEIGHTS, rgb);
    (cb, cr)
}

#[inline]
fn dot(w: [f64; 3], v: [f64; 3]) -> f64 {
    w[0] * v[0] + w[1] * v[1] + w[2] * v[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(0, 0, 0), 0);
    }

    #[test]
    fn test_luminance_primaries() {
        assert_eq!(luminance(255, 0, 0), 54);
        assert_eq!(luminance(0, 255, 0), 182);
        assert_eq!(luminance(0, 0, 255), 18);
    }

    #[test]
    fn test_luminance_gray_is_identity() {
        for k in 0..=255u8 {
            let y = luminance(k, k, k) as i16;
            assert!((y - k as i16).abs() <= 1, "k={k} y={y}");
        }
    }

    #[test]
    fn test_chroma_neutral_is_centered() {
        for k in [0u8, 17, 128, 200, 255] {
            let (cb, cr) = chroma(k, k, k);
            assert!((cb - 128.0).abs() < 1e-3, "cb={cb}");
            assert!((cr - 128.0).abs() < 1e-3, "cr={cr}");
        }
    }

    #[test]
    fn test_chroma_red_pushes_cr_up() {
        let (cb, cr) = chroma(255, 0, 0);
        assert!(cr > 250.0);
        assert!(cb < 128.0);
    }

    #[test]
    fn test_chroma_blue_pushes_cb_up() {
        let (cb, cr) = chroma(0, 0, 255);
        assert!(cb > 250.0);
        assert!(cr < 128.0);
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let px = Rgb8::from(Rgba8 { r: 1, g: 2, b: 3, a: 9 });
        assert_eq!(px, Rgb8::new(1, 2, 3));
    }
}
