//! Frame loading for the demo application.

use std::path::Path;

use scopekit_core::OwnedFrame;
use scopekit_core::color::Rgb8;

/// Load a still image from disk as an 8-bit RGBA frame.
///
/// Anything the `image` crate decodes is accepted; higher bit depths are
/// reduced to 8 bits per channel.
pub fn load_frame(path: &Path) -> Result<OwnedFrame, ImageLoadError> {
    if !path.exists() {
        return Err(ImageLoadError::NotFound(path.display().to_string()));
    }
    let img = image::open(path).map_err(ImageLoadError::Decode)?;
    tracing::info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(OwnedFrame::from(img))
}

/// 75% color bars over a horizontal luma ramp.
///
/// The top two thirds hold the seven bars (white, yellow, cyan, green,
/// magenta, red, blue); the bottom third ramps black to white.
pub fn test_pattern(width: u32, height: u32) -> OwnedFrame {
    const BARS: [Rgb8; 7] = [
        Rgb8::new(191, 191, 191),
        Rgb8::new(191, 191, 0),
        Rgb8::new(0, 191, 191),
        Rgb8::new(0, 191, 0),
        Rgb8::new(191, 0, 191),
        Rgb8::new(191, 0, 0),
        Rgb8::new(0, 0, 191),
    ];
    let bar_rows = height * 2 / 3;
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let px = if y < bar_rows {
                BARS[(x as usize * BARS.len() / width.max(1) as usize).min(BARS.len() - 1)]
            } else {
                let v = (x * 255 / width.saturating_sub(1).max(1)) as u8;
                Rgb8::new(v, v, v)
            };
            data.extend_from_slice(&[px.r, px.g, px.b]);
        }
    }
    OwnedFrame::new(width, height, scopekit_core::PixelLayout::Rgb, data)
}

/// Errors that can occur during image loading.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
}
