//! Frame hand-off between a capture producer and the scope cycle.

use std::sync::Arc;

use parking_lot::Mutex;
use scopekit_core::OwnedFrame;

/// Anything that can hand the scheduler the most recent frame.
pub trait FrameSource: Send + Sync + 'static {
    /// The newest available frame, or `None` if nothing has arrived yet.
    fn latest_frame(&self) -> Option<Arc<OwnedFrame>>;
}

#[derive(Debug, Default)]
struct SlotState {
    frame: Option<Arc<OwnedFrame>>,
    /// Bumped on every publish.
    generation: u64,
    /// Generation of the last frame handed to the consumer.
    read_generation: u64,
    published: u64,
    dropped: u64,
}

/// Single-slot, last-frame-wins mailbox.
///
/// The producer overwrites the slot whenever it has a new frame; the
/// consumer reads whatever is newest at the start of a cycle. There is no
/// queue, so frames published faster than the cadence are never read.
#[derive(Debug, Default)]
pub struct LatestFrameSlot {
    state: Mutex<SlotState>,
}

impl LatestFrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame.
    pub fn publish(&self, frame: OwnedFrame) {
        let mut state = self.state.lock();
        if state.frame.is_some() && state.read_generation != state.generation {
            state.dropped += 1;
        }
        state.frame = Some(Arc::new(frame));
        state.generation += 1;
        state.published += 1;
    }

    /// Drop the current frame; the consumer sees `None` until the next publish.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.frame = None;
        state.read_generation = state.generation;
    }

    /// Frames published so far.
    pub fn published(&self) -> u64 {
        self.state.lock().published
    }

    /// Frames overwritten before any cycle read them.
    pub fn dropped(&self) -> u64 {
        self.state.lock().dropped
    }

    /// Generation of the current frame (0 before the first publish).
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}

impl FrameSource for LatestFrameSlot {
    fn latest_frame(&self) -> Option<Arc<OwnedFrame>> {
        let mut state = self.state.lock();
        state.read_generation = state.generation;
        state.frame.clone()
    }
}
