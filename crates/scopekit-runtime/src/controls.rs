//! Externally owned cycle controls: crop region and scope visibility.

use std::sync::Arc;

use parking_lot::RwLock;
use scopekit_core::{CropRegion, ScopeKind, ScopeVisibility};

/// Read-only copy of the controls taken once at the start of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlSnapshot {
    pub crop: Option<CropRegion>,
    pub visibility: ScopeVisibility,
}

/// Cloneable handle to the controls. The UI writes, the pipeline only snapshots.
#[derive(Debug, Clone, Default)]
pub struct SharedControls {
    inner: Arc<RwLock<ControlSnapshot>>,
}

impl SharedControls {
    pub fn new(visibility: ScopeVisibility) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ControlSnapshot {
                crop: None,
                visibility,
            })),
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        *self.inner.read()
    }

    pub fn set_crop(&self, crop: CropRegion) {
        self.inner.write().crop = Some(crop.clamped());
    }

    pub fn clear_crop(&self) {
        self.inner.write().crop = None;
    }

    pub fn set_visible(&self, kind: ScopeKind, visible: bool) {
        let mut controls = self.inner.write();
        if controls.visibility.is_visible(kind) != visible {
            controls.visibility.set(kind, visible);
            tracing::debug!("{kind} visibility -> {visible}");
        }
    }

    pub fn set_visibility(&self, visibility: ScopeVisibility) {
        self.inner.write().visibility = visibility;
    }
}
