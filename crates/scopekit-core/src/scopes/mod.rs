//! Scope rendering: waveform, RGB parade, vectorscope, and histogram.
//!
//! Each renderer is a pure function of a [`FrameAnalysis`] and the
//! [`ScopeConfig`]; the intensity maps they accumulate into live in a
//! caller-owned [`ScopeScratch`] so allocations are reused across cycles.

pub mod histogram;
pub mod parade;
pub mod vectorscope;
pub mod waveform;

use std::fmt;
use std::str::FromStr;

use crate::accumulator::IntensityMap;
use crate::analyzer::FrameAnalysis;
use crate::config::ScopeConfig;
use crate::raster::{Raster, Rgb};

pub use crate::config::ScopeVisibility;

/// Canvas background shared by every scope.
pub const BACKGROUND: Rgb = [8, 9, 10];

/// The four scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Waveform,
    Parade,
    Vectorscope,
    Histogram,
}

impl ScopeKind {
    pub const ALL: [Self; 4] = [Self::Waveform, Self::Parade, Self::Vectorscope, Self::Histogram];

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Waveform => "Waveform",
            Self::Parade => "RGB Parade",
            Self::Vectorscope => "Vectorscope",
            Self::Histogram => "Histogram",
        }
    }

    /// Lowercase identifier used in config keys and file names.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Waveform => "waveform",
            Self::Parade => "parade",
            Self::Vectorscope => "vectorscope",
            Self::Histogram => "histogram",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when parsing an unrecognized scope name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope kind: {0}")]
pub struct UnknownScopeKind(pub String);

impl FromStr for ScopeKind {
    type Err = UnknownScopeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waveform" | "luma" => Ok(Self::Waveform),
            "parade" | "rgb_parade" | "rgbparade" => Ok(Self::Parade),
            "vectorscope" | "vector" => Ok(Self::Vectorscope),
            "histogram" => Ok(Self::Histogram),
            other => Err(UnknownScopeKind(other.to_string())),
        }
    }
}

impl ScopeVisibility {
    /// Everything hidden.
    pub const NONE: Self = Self {
        waveform: false,
        parade: false,
        vectorscope: false,
        histogram: false,
    };

    pub fn is_visible(&self, kind: ScopeKind) -> bool {
        match kind {
            ScopeKind::Waveform => self.waveform,
            ScopeKind::Parade => self.parade,
            ScopeKind::Vectorscope => self.vectorscope,
            ScopeKind::Histogram => self.histogram,
        }
    }

    pub fn set(&mut self, kind: ScopeKind, visible: bool) {
        match kind {
            ScopeKind::Waveform => self.waveform = visible,
            ScopeKind::Parade => self.parade = visible,
            ScopeKind::Vectorscope => self.vectorscope = visible,
            ScopeKind::Histogram => self.histogram = visible,
        }
    }

    pub fn any(&self) -> bool {
        ScopeKind::ALL.iter().any(|&k| self.is_visible(k))
    }
}

/// Reusable intensity maps, one per accumulating scope (three for parade).
#[derive(Debug, Clone, Default)]
pub struct ScopeScratch {
    pub waveform: IntensityMap,
    pub parade: [IntensityMap; 3],
    pub vectorscope: IntensityMap,
}

impl ScopeScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One cycle's rendered scopes. Hidden scopes are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeImages {
    pub waveform: Option<Raster>,
    pub parade: Option<Raster>,
    pub vectorscope: Option<Raster>,
    pub histogram: Option<Raster>,
}

impl ScopeImages {
    pub fn get(&self, kind: ScopeKind) -> Option<&Raster> {
        match kind {
            ScopeKind::Waveform => self.waveform.as_ref(),
            ScopeKind::Parade => self.parade.as_ref(),
            ScopeKind::Vectorscope => self.vectorscope.as_ref(),
            ScopeKind::Histogram => self.histogram.as_ref(),
        }
    }

    /// Rendered scopes in [`ScopeKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ScopeKind, &Raster)> {
        ScopeKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|r| (kind, r)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render every visible scope for one analyzed frame.
pub fn render_scopes(
    analysis: &FrameAnalysis,
    config: &ScopeConfig,
    visibility: ScopeVisibility,
    scratch: &mut ScopeScratch,
) -> ScopeImages {
    let mut images = ScopeImages::default();
    if visibility.waveform {
        images.waveform = Some(waveform::render(analysis, config, &mut scratch.waveform));
    }
    if visibility.parade {
        images.parade = Some(parade::render(analysis, config, &mut scratch.parade));
    }
    if visibility.vectorscope {
        images.vectorscope = Some(vectorscope::render(analysis, config, &mut scratch.vectorscope));
    }
    if visibility.histogram {
        images.histogram = Some(histogram::render(analysis, config));
    }
    images
}

/// Plot column data into `map`: column `c` of `n` covers canvas x from
/// `floor(c / n · width)` up to the next column's start, and value `v`
/// lands on row `floor((height − 1) − v / 255 · (height − 1))`.
pub(crate) fn plot_columns<'a>(
    map: &mut IntensityMap,
    columns: impl ExactSizeIterator<Item = &'a [u8]>,
) {
    let (width, height) = (map.width() as u64, map.height());
    let count = columns.len() as u64;
    if count == 0 || width == 0 || height == 0 {
        return;
    }

    let rows = value_rows(height);
    for (c, values) in columns.enumerate() {
        let c = c as u64;
        let x0 = c * width / count;
        let x1 = ((c + 1) * width / count).max(x0 + 1);
        for &v in values {
            let y = rows[v as usize];
            for x in x0..x1 {
                map.plot(x as i64, y);
            }
        }
    }
}

/// Canvas row for every 8-bit value (255 at the top, 0 at the bottom).
fn value_rows(height: u32) -> [i64; 256] {
    let span = height.saturating_sub(1) as f64;
    let mut rows = [0i64; 256];
    for (v, row) in rows.iter_mut().enumerate() {
        *row = (span - v as f64 / 255.0 * span).floor() as i64;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::color::Rgb8;
    use crate::frame::OwnedFrame;

    #[test]
    fn test_scope_kind_parse() {
        assert_eq!("Waveform".parse::<ScopeKind>().unwrap(), ScopeKind::Waveform);
        assert_eq!(" parade ".parse::<ScopeKind>().unwrap(), ScopeKind::Parade);
        assert!("cie".parse::<ScopeKind>().is_err());
    }

    #[test]
    fn test_visibility_toggle() {
        let mut v = ScopeVisibility::default();
        v.set(ScopeKind::Histogram, false);
        assert!(!v.is_visible(ScopeKind::Histogram));
        assert!(v.any());
        assert!(!ScopeVisibility::NONE.any());
    }

    #[test]
    fn test_render_scopes_respects_visibility() {
        let frame = OwnedFrame::solid(16, 8, Rgb8::new(40, 80, 120));
        let analysis = analyze(&frame.view().unwrap(), 50_000).unwrap();
        let config = ScopeConfig::default();
        let mut scratch = ScopeScratch::new();

        let mut visibility = ScopeVisibility::default();
        visibility.parade = false;
        let images = render_scopes(&analysis, &config, visibility, &mut scratch);
        assert!(images.parade.is_none());
        assert_eq!(images.len(), 3);

        let none = render_scopes(&analysis, &config, ScopeVisibility::NONE, &mut scratch);
        assert!(none.is_empty());
    }

    #[test]
    fn test_plot_columns_fills_every_canvas_column() {
        let mut map = IntensityMap::new(10, 4);
        let columns: Vec<Vec<u8>> = vec![vec![255; 2]; 3];
        plot_columns(&mut map, columns.iter().map(Vec::as_slice));
        for x in 0..10 {
            assert!(map.get(x, 0) > 0, "column {x} empty");
        }
        assert_eq!(map.lit_cells(), 10);
    }

    #[test]
    fn test_value_rows_endpoints() {
        let rows = value_rows(256);
        assert_eq!(rows[255], 0);
        assert_eq!(rows[0], 255);
    }
}
