//! Scope pipeline configuration.
//!
//! Every field has a default so a config file only needs the values it
//! changes. Tunables with a documented usable range are clamped by
//! [`ScopeConfig::sanitized`] with a warning instead of being rejected.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::DEFAULT_SAMPLE_BUDGET;
use crate::error::ConfigError;

/// Default analysis width cap in pixels.
const DEFAULT_MAX_ANALYSIS_WIDTH: u32 = 320;
/// Default cycle cadence (~15 Hz).
const DEFAULT_CADENCE_MS: u64 = 66;

/// Usable gain range for waveform and parade.
pub const LINEAR_GAIN_RANGE: RangeInclusive<f32> = 3.0..=8.0;
/// Usable gain range for the vectorscope.
pub const VECTOR_GAIN_RANGE: RangeInclusive<f32> = 5.0..=10.0;
/// Usable vectorscope stamp radius; each sample plots `(2r + 1)²` cells.
pub const STAMP_RADIUS_RANGE: RangeInclusive<u32> = 0..=4;
/// Usable edge length for any scope canvas, in pixels.
pub const CANVAS_EDGE_RANGE: RangeInclusive<u32> = 1..=4096;

/// Output canvas size for one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Output canvas sizes for every scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSizes {
    pub waveform: CanvasSize,
    pub parade: CanvasSize,
    /// Square; only `width` is used as the diameter.
    pub vectorscope: CanvasSize,
    pub histogram: CanvasSize,
}

impl Default for CanvasSizes {
    fn default() -> Self {
        Self {
            waveform: CanvasSize::new(512, 256),
            parade: CanvasSize::new(768, 256),
            vectorscope: CanvasSize::new(320, 320),
            histogram: CanvasSize::new(512, 256),
        }
    }
}

/// Which scopes are rendered each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeVisibility {
    pub waveform: bool,
    pub parade: bool,
    pub vectorscope: bool,
    pub histogram: bool,
}

impl Default for ScopeVisibility {
    fn default() -> Self {
        Self {
            waveform: true,
            parade: true,
            vectorscope: true,
            histogram: true,
        }
    }
}

/// Tunables for analysis and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub visibility: ScopeVisibility,
    /// Frames wider than this are downscaled before analysis. `0` disables.
    pub max_analysis_width: u32,
    /// Time between cycle starts.
    pub cadence_ms: u64,
    /// Target number of vectorscope samples per frame.
    pub vector_sample_budget: usize,
    pub waveform_gain: f32,
    pub parade_gain: f32,
    pub vectorscope_gain: f32,
    /// Half-size of the stamp each vectorscope sample plots (1 → 3×3, 0 → 1 px).
    pub vectorscope_stamp_radius: u32,
    /// Opacity of histogram bars.
    pub histogram_alpha: f32,
    pub canvas: CanvasSizes,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            visibility: ScopeVisibility::default(),
            max_analysis_width: DEFAULT_MAX_ANALYSIS_WIDTH,
            cadence_ms: DEFAULT_CADENCE_MS,
            vector_sample_budget: DEFAULT_SAMPLE_BUDGET,
            waveform_gain: 5.0,
            parade_gain: 5.0,
            vectorscope_gain: 8.0,
            vectorscope_stamp_radius: 1,
            histogram_alpha: 0.65,
            canvas: CanvasSizes::default(),
        }
    }
}

impl ScopeConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::info!("loaded scope config from {}", path.display());
        Ok(config)
    }

    /// Apply `SCOPEKIT_*` environment overrides on top of this config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_parse("SCOPEKIT_CADENCE_MS") {
            self.cadence_ms = v;
        }
        if let Some(v) = env_parse("SCOPEKIT_MAX_WIDTH") {
            self.max_analysis_width = v;
        }
        if let Some(v) = env_parse("SCOPEKIT_SAMPLE_BUDGET") {
            self.vector_sample_budget = v;
        }
        self.sanitized()
    }

    /// Clamp tunables into their usable ranges.
    pub fn sanitized(mut self) -> Self {
        self.waveform_gain = clamp_gain("waveform_gain", self.waveform_gain, LINEAR_GAIN_RANGE);
        self.parade_gain = clamp_gain("parade_gain", self.parade_gain, LINEAR_GAIN_RANGE);
        self.vectorscope_gain =
            clamp_gain("vectorscope_gain", self.vectorscope_gain, VECTOR_GAIN_RANGE);

        if !(0.0..=1.0).contains(&self.histogram_alpha) {
            tracing::warn!(
                "histogram_alpha {} out of range, clamping to [0, 1]",
                self.histogram_alpha
            );
            self.histogram_alpha = if self.histogram_alpha.is_nan() {
                0.65
            } else {
                self.histogram_alpha.clamp(0.0, 1.0)
            };
        }
        self.vectorscope_stamp_radius = clamp_range(
            "vectorscope_stamp_radius",
            self.vectorscope_stamp_radius,
            STAMP_RADIUS_RANGE,
        );
        let canvas = &mut self.canvas;
        for (name, size) in [
            ("waveform", &mut canvas.waveform),
            ("parade", &mut canvas.parade),
            ("vectorscope", &mut canvas.vectorscope),
            ("histogram", &mut canvas.histogram),
        ] {
            size.width = clamp_range(name, size.width, CANVAS_EDGE_RANGE);
            size.height = clamp_range(name, size.height, CANVAS_EDGE_RANGE);
        }

        if self.cadence_ms == 0 {
            tracing::warn!("cadence_ms of 0 would spin; using {DEFAULT_CADENCE_MS}ms");
            self.cadence_ms = DEFAULT_CADENCE_MS;
        }
        if self.vector_sample_budget == 0 {
            tracing::warn!("vector_sample_budget of 0; using {DEFAULT_SAMPLE_BUDGET}");
            self.vector_sample_budget = DEFAULT_SAMPLE_BUDGET;
        }
        self
    }

    pub fn cadence(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.cadence_ms)
    }
}

fn clamp_gain(name: &str, value: f32, range: RangeInclusive<f32>) -> f32 {
    if range.contains(&value) {
        return value;
    }
    let clamped = if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    };
    tracing::warn!("{name} {value} outside {range:?}, using {clamped}");
    clamped
}

fn clamp_range(name: &str, value: u32, range: RangeInclusive<u32>) -> u32 {
    if range.contains(&value) {
        return value;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    tracing::warn!("{name} {value} outside {range:?}, using {clamped}");
    clamped
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
