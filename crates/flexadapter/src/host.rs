//! The host widget seam.
//!
//! A host is the list or grid widget that owns the visible rendering units.
//! It learns about structural changes through [`HostWidget`] and pulls
//! everything else (kinds, units, spans) from the adapter on demand.

use parking_lot::Mutex;

use crate::model::StructuralChange;

/// Receives structural changes from an adapter.
///
/// Called synchronously after each change, in the order the changes were
/// made. Implementations may call back into the adapter; changes they make
/// reach every host after the change being handled.
pub trait HostWidget: Send + Sync {
    /// A structural change was applied.
    fn on_structural_change(&self, change: &StructuralChange);
}

/// A host that records every change it receives.
///
/// Useful for headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    changes: Mutex<Vec<StructuralChange>>,
}

impl RecordingHost {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The changes received so far, in order.
    pub fn changes(&self) -> Vec<StructuralChange> {
        self.changes.lock().clone()
    }

    /// Remove and return the changes received so far.
    pub fn take(&self) -> Vec<StructuralChange> {
        std::mem::take(&mut *self.changes.lock())
    }
}

impl HostWidget for RecordingHost {
    fn on_structural_change(&self, change: &StructuralChange) {
        self.changes.lock().push(*change);
    }
}
