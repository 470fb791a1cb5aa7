//! RGB histogram rendering.
//!
//! Draws the R, G and B frequency tables as overlapping semi-transparent
//! bar series, all scaled against one shared peak so channel heights are
//! directly comparable. The luma table is not drawn.

use crate::analyzer::{Channel, FrameAnalysis};
use crate::config::ScopeConfig;
use crate::font;
use crate::raster::{Raster, Rgb};

use super::BACKGROUND;

/// Brightness values marked with a gridline and label.
pub const GRID_VALUES: [u32; 5] = [0, 64, 128, 192, 255];

const GRID: Rgb = [44, 46, 50];
const LABEL: Rgb = [150, 156, 152];

fn bar_color(channel: Channel) -> Rgb {
    match channel {
        Channel::Red => [240, 60, 60],
        Channel::Green => [60, 230, 70],
        Channel::Blue => [70, 110, 255],
    }
}

/// Left edge of a bin's bar, with bars `width / 256` wide.
#[inline]
pub fn bin_x(bin: u32, width: u32) -> i32 {
    (bin as u64 * width as u64 / 256) as i32
}

/// Render the histogram into a fresh raster sized by `config.canvas.histogram`.
pub fn render(analysis: &FrameAnalysis, config: &ScopeConfig) -> Raster {
    let size = config.canvas.histogram;
    let mut raster = Raster::new(size.width, size.height, BACKGROUND);
    let (w, h) = (size.width, size.height as i32);

    let peak = analysis.histogram.peak_rgb() as f64;
    for channel in Channel::ALL {
        let table = analysis.histogram.channel(channel);
        let color = bar_color(channel);
        for (bin, &count) in table.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let bar_h = ((count as f64 / peak) * h as f64).round().max(1.0) as i32;
            let x0 = bin_x(bin as u32, w);
            let x1 = bin_x(bin as u32 + 1, w).max(x0 + 1);
            raster.blend_rect(x0, h - bar_h, (x1 - x0) as u32, bar_h as u32, color, config.histogram_alpha);
        }
    }

    // Gridlines stay visible through full-height bars.
    draw_grid(&mut raster);

    let label_y = h - font::GLYPH_H as i32 - 2;
    for v in GRID_VALUES {
        let label = v.to_string();
        let max_x = w as i32 - font::text_width(&label) as i32 - 1;
        raster.text((bin_x(v, w) + 2).min(max_x), label_y, &label, LABEL);
    }

    raster
}

fn draw_grid(raster: &mut Raster) {
    let (w, h) = (raster.width(), raster.height() as i32);
    for v in GRID_VALUES {
        raster.vline(bin_x(v, w), 0, h - 1, GRID);
    }
}
