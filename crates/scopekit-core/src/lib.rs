//! Scopekit Core: frame analysis and scope rendering.
//!
//! This crate contains the color math, the single-pass frame analyzer,
//! the intensity accumulator, graticule overlays, and the four scope
//! renderers (waveform, RGB parade, vectorscope, histogram). No async or
//! framework dependencies.

pub mod accumulator;
pub mod analyzer;
pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod frame;
pub mod graticule;
pub mod raster;
pub mod scopes;

// Re-exports for convenience.
pub use accumulator::{ColorRamp, IntensityMap};
pub use analyzer::{FrameAnalysis, analyze};
pub use config::ScopeConfig;
pub use error::{ConfigError, FrameError};
pub use frame::{CropRegion, FrameView, OwnedFrame, PixelLayout};
pub use raster::Raster;
pub use scopes::{ScopeImages, ScopeKind, ScopeScratch, ScopeVisibility, render_scopes};
