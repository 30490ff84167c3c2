//! Prelude module for FlexAdapter.
//!
//! ```ignore
//! use flexadapter::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use crate::{AdapterError, ConnectionId, Property, Result, Signal};

// ============================================================================
// Adapter
// ============================================================================

pub use crate::adapter::{FlexAdapter, RealizedUnit};
pub use crate::config::AdapterConfig;
pub use crate::host::HostWidget;

// ============================================================================
// Items
// ============================================================================

pub use crate::model::{
    DetachedContainer, FlexItem, HostContainer, ItemAttrs, ItemHandle, ItemKind, RenderUnit,
};

// ============================================================================
// Collection and Gestures
// ============================================================================

pub use crate::model::{
    Direction, Directions, DragEvent, GestureOutcome, ItemCollection, StructuralChange, SwipeEvent,
    diff, diff_by,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_types_exist() {
        let _signal: Signal<StructuralChange> = Signal::new();
        let _property: Property<String> = Property::new(String::new());
        let adapter = FlexAdapter::new(AdapterConfig::default()).unwrap();
        assert!(adapter.items().is_empty());
        assert_eq!(Directions::from(Direction::Up), Directions::UP);
    }
}
