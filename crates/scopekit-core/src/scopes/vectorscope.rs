//! Vectorscope rendering.
//!
//! Each decimated chroma sample is placed on the Cb/Cr plane: angle is hue,
//! distance from center is saturation. Samples are stamped into a small
//! neighborhood so a sparse sample set still reads as a continuous trace.

use std::sync::LazyLock;

use glam::DVec2;

use crate::accumulator::{ColorRamp, IntensityMap};
use crate::analyzer::{ColorPoint, FrameAnalysis};
use crate::color::CHROMA_CENTER;
use crate::config::ScopeConfig;
use crate::graticule::{self, GraticuleKind, PolarGeometry};
use crate::raster::Raster;

use super::BACKGROUND;

static RAMP: LazyLock<ColorRamp> = LazyLock::new(ColorRamp::vectorscope);

/// Canvas position of a chroma sample: `x = c + (cb−128)/128·r`,
/// `y = c − (cr−128)/128·r`.
pub fn plot_position(point: &ColorPoint, geo: &PolarGeometry) -> DVec2 {
    let center = geo.center.as_dvec2();
    let radius = geo.radius as f64;
    DVec2::new(
        center.x + (point.cb - CHROMA_CENTER) / CHROMA_CENTER * radius,
        center.y - (point.cr - CHROMA_CENTER) / CHROMA_CENTER * radius,
    )
}

/// Render the vectorscope into a square raster `config.canvas.vectorscope.width` on a side.
pub fn render(analysis: &FrameAnalysis, config: &ScopeConfig, map: &mut IntensityMap) -> Raster {
    let diameter = config.canvas.vectorscope.width;
    let mut raster = Raster::new(diameter, diameter, BACKGROUND);
    let geo = PolarGeometry::fit(diameter, diameter);

    graticule::draw(&mut raster, GraticuleKind::Vectorscope);

    map.reset(diameter, diameter);
    let stamp = config.vectorscope_stamp_radius;
    for point in &analysis.points {
        let p = plot_position(point, &geo).round();
        map.stamp(p.x as i64, p.y as i64, stamp);
    }
    map.normalize_and_colorize(&mut raster, (0, 0), config.vectorscope_gain, &RAMP);

    graticule::draw(&mut raster, GraticuleKind::Vectorscope);
    raster
}
