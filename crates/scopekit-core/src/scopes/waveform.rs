//! Waveform (luma) scope rendering.
//!
//! Plots each analysis column's luma values against horizontal position,
//! 0 at the bottom and 255 at the top, as a green phosphor trace.

use std::sync::LazyLock;

use crate::accumulator::{ColorRamp, IntensityMap};
use crate::analyzer::FrameAnalysis;
use crate::config::ScopeConfig;
use crate::graticule::{self, GraticuleKind};
use crate::raster::Raster;

use super::{BACKGROUND, plot_columns};

static RAMP: LazyLock<ColorRamp> = LazyLock::new(ColorRamp::waveform);

/// Render the waveform into a fresh raster sized by `config.canvas.waveform`.
pub fn render(analysis: &FrameAnalysis, config: &ScopeConfig, map: &mut IntensityMap) -> Raster {
    let size = config.canvas.waveform;
    let mut raster = Raster::new(size.width, size.height, BACKGROUND);

    graticule::draw(&mut raster, GraticuleKind::Waveform);

    map.reset(size.width, size.height);
    plot_columns(map, analysis.waveform.columns());
    map.normalize_and_colorize(&mut raster, (0, 0), config.waveform_gain, &RAMP);

    // Re-draw on top so reference lines stay legible through dense signal.
    graticule::draw(&mut raster, GraticuleKind::Waveform);
    raster
}
