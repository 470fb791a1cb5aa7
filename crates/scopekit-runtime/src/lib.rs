//! Scopekit Runtime: drives the scope pipeline at a fixed cadence.
//!
//! Provides a last-frame-wins [`LatestFrameSlot`] between a capture
//! producer and the analyzer, [`SharedControls`] for the crop region and
//! scope visibility, the per-cycle [`ScopePipeline`], and the async
//! [`ScopeScheduler`] that runs one cycle per tick.

pub mod controls;
pub mod error;
pub mod pipeline;
pub mod scheduler;
pub mod source;

pub use controls::{ControlSnapshot, SharedControls};
pub use error::RuntimeError;
pub use pipeline::{CycleStats, ScopePipeline};
pub use scheduler::{SchedulerHandle, ScopeScheduler, ScopeSink};
pub use source::{FrameSource, LatestFrameSlot};
