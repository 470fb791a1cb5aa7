//! RGB parade scope rendering.
//!
//! The canvas is split into three equal panels (R, G, B, left to right);
//! each panel is an independent waveform of that channel's raw values.

use std::sync::LazyLock;

use crate::accumulator::{ColorRamp, IntensityMap};
use crate::analyzer::{Channel, FrameAnalysis};
use crate::config::ScopeConfig;
use crate::graticule::{self, GraticuleKind};
use crate::raster::Raster;

use super::{BACKGROUND, plot_columns};

static RAMPS: LazyLock<[ColorRamp; 3]> = LazyLock::new(|| {
    [
        ColorRamp::parade_red(),
        ColorRamp::parade_green(),
        ColorRamp::parade_blue(),
    ]
});

/// Render the parade into a fresh raster sized by `config.canvas.parade`.
///
/// `maps` holds one scratch map per channel, each sized to the panel.
pub fn render(
    analysis: &FrameAnalysis,
    config: &ScopeConfig,
    maps: &mut [IntensityMap; 3],
) -> Raster {
    let size = config.canvas.parade;
    let mut raster = Raster::new(size.width, size.height, BACKGROUND);
    let panel = size.width / 3;

    graticule::draw(&mut raster, GraticuleKind::Parade);

    for channel in Channel::ALL {
        let i = channel.index();
        let map = &mut maps[i];
        map.reset(panel, size.height);
        plot_columns(map, analysis.parade.columns(channel));
        map.normalize_and_colorize(&mut raster, (panel * i as u32, 0), config.parade_gain, &RAMPS[i]);
    }

    graticule::draw(&mut raster, GraticuleKind::Parade);
    raster
}
