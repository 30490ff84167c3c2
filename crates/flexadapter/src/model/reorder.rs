//! Drag-to-reorder.
//!
//! [`ReorderPolicy`] is a small state machine driven by the host's drag
//! recognizer:
//!
//! ```text
//!            start(i), item draggable
//!   Idle ─────────────────────────────▶ Dragging { origin, current }
//!    ▲                                      │  over(t), eligible:
//!    │        end() / cancel()              │  move current -> t
//!    └──────────────────────────────────────┘
//! ```
//!
//! Each accepted step commits immediately through
//! [`ItemCollection::move_item`], so the host sees ordinary `Moved` changes
//! while the finger is still down. A step is eligible when both the dragged
//! item and the item it displaces allow the direction of the motion.
//!
//! The dragged item is tracked by reference, not by index, so the drag
//! survives unrelated insertions and removals made while it is in flight.

use parking_lot::Mutex;

use flexadapter_core::logging::targets;
use flexadapter_core::{AdapterError, Result};

use super::collection::ItemCollection;
use super::gesture::{Direction, GestureOutcome};
use super::item::ItemHandle;
use super::span::SpanResolver;

/// A reorder reported to the drag listener.
#[derive(Debug, Clone)]
pub struct DragEvent {
    /// The dragged item.
    pub item: ItemHandle,
    /// Where the item was before the reported move.
    pub from: usize,
    /// Where the item is now.
    pub to: usize,
}

/// The observable state of the drag state machine.
#[derive(Debug, Clone)]
pub enum DragState {
    /// No drag in progress.
    Idle,
    /// An item is being dragged.
    Dragging {
        item: ItemHandle,
        origin: usize,
        current: usize,
    },
}

impl DragState {
    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// What a drag report did, plus the event to hand the drag listener, if any.
#[derive(Debug, Clone)]
pub struct DragResponse {
    pub outcome: GestureOutcome,
    pub event: Option<DragEvent>,
}

impl DragResponse {
    fn accepted(event: Option<DragEvent>) -> Self {
        Self {
            outcome: GestureOutcome::Accepted,
            event,
        }
    }

    fn rejected() -> Self {
        Self {
            outcome: GestureOutcome::Rejected,
            event: None,
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    item: ItemHandle,
    origin: usize,
    current: usize,
}

/// Converts drag reports into collection moves.
#[derive(Debug)]
pub struct ReorderPolicy {
    active: Mutex<Option<ActiveDrag>>,
    events_on_drop_only: bool,
    rollback_on_cancel: bool,
}

impl ReorderPolicy {
    /// Create an idle policy.
    ///
    /// With `events_on_drop_only`, one [`DragEvent`] spanning the whole drag
    /// is produced when it ends; otherwise one is produced per accepted step.
    /// With `rollback_on_cancel`, a cancelled drag puts the item back where it
    /// started.
    pub fn new(events_on_drop_only: bool, rollback_on_cancel: bool) -> Self {
        Self {
            active: Mutex::new(None),
            events_on_drop_only,
            rollback_on_cancel,
        }
    }

    /// The current state.
    pub fn state(&self) -> DragState {
        match &*self.active.lock() {
            Some(drag) => DragState::Dragging {
                item: drag.item.clone(),
                origin: drag.origin,
                current: drag.current,
            },
            None => DragState::Idle,
        }
    }

    /// Begin dragging the item at `index`.
    ///
    /// A drag already in progress is cancelled first. Items without any drag
    /// direction cannot be picked up.
    pub fn start(&self, items: &ItemCollection, index: usize) -> Result<DragResponse> {
        let item = items
            .get(index)
            .ok_or_else(|| AdapterError::out_of_range(index, items.len()))?;

        let superseded = if self.state().is_dragging() {
            tracing::debug!(target: targets::GESTURE, index, "new drag supersedes the active one");
            Some(self.cancel(items)?)
        } else {
            None
        };

        if item.drag_directions().is_empty() {
            tracing::trace!(target: targets::GESTURE, index, item = item.type_name(), "item is not draggable");
            return Ok(DragResponse {
                outcome: GestureOutcome::Rejected,
                event: superseded.and_then(|response| response.event),
            });
        }

        *self.active.lock() = Some(ActiveDrag {
            item,
            origin: index,
            current: index,
        });
        tracing::trace!(target: targets::GESTURE, index, "drag started");
        Ok(DragResponse::accepted(
            superseded.and_then(|response| response.event),
        ))
    }

    /// The dragged item is hovering over `target`.
    pub fn over(
        &self,
        items: &ItemCollection,
        resolver: &SpanResolver,
        target: usize,
    ) -> Result<DragResponse> {
        let Some(drag) = self.active.lock().clone() else {
            tracing::trace!(target: targets::GESTURE, target, "drag report without an active drag");
            return Ok(DragResponse::rejected());
        };
        let Some(current) = self.locate(items, &drag) else {
            return Ok(DragResponse::rejected());
        };
        let displaced = items
            .get(target)
            .ok_or_else(|| AdapterError::out_of_range(target, items.len()))?;
        if target == current {
            return Ok(DragResponse::accepted(None));
        }

        let direction = motion_direction(items, resolver, current, target)?;
        if !drag.item.drag_directions().allows(direction) {
            tracing::trace!(target: targets::GESTURE, %direction, current, target, "dragged item forbids direction");
            return Ok(DragResponse::rejected());
        }
        if !displaced.drag_directions().allows(direction) {
            tracing::trace!(target: targets::GESTURE, %direction, current, target, "displaced item cannot make way");
            return Ok(DragResponse::rejected());
        }

        items.move_item(current, target)?;

        if let Some(active) = self.active.lock().as_mut() {
            if active.item.ptr_eq(&drag.item) {
                active.current = target;
            }
        }

        let event = (!self.events_on_drop_only).then(|| DragEvent {
            item: drag.item,
            from: current,
            to: target,
        });
        Ok(DragResponse::accepted(event))
    }

    /// The item was dropped. The order is already committed.
    pub fn end(&self, items: &ItemCollection) -> DragResponse {
        let Some(drag) = self.active.lock().take() else {
            return DragResponse::rejected();
        };
        let Some(current) = items.index_of(&drag.item) else {
            tracing::debug!(target: targets::GESTURE, "dragged item removed before drop");
            return DragResponse::rejected();
        };
        tracing::trace!(target: targets::GESTURE, origin = drag.origin, current, "drag ended");
        DragResponse::accepted(self.drop_event(drag, current))
    }

    /// The drag was aborted by the host.
    ///
    /// Leaves the intermediate order in place unless rollback is enabled.
    pub fn cancel(&self, items: &ItemCollection) -> Result<DragResponse> {
        let Some(drag) = self.active.lock().take() else {
            return Ok(DragResponse::rejected());
        };
        let Some(current) = items.index_of(&drag.item) else {
            tracing::debug!(target: targets::GESTURE, "dragged item removed before cancel");
            return Ok(DragResponse::rejected());
        };

        if self.rollback_on_cancel {
            let origin = drag.origin.min(items.len() - 1);
            tracing::debug!(target: targets::GESTURE, current, origin, "rolling back cancelled drag");
            items.move_item(current, origin)?;
            return Ok(DragResponse::accepted(None));
        }

        tracing::debug!(target: targets::GESTURE, origin = drag.origin, current, "drag cancelled");
        Ok(DragResponse::accepted(self.drop_event(drag, current)))
    }

    fn drop_event(&self, drag: ActiveDrag, current: usize) -> Option<DragEvent> {
        (self.events_on_drop_only && drag.origin != current).then(|| DragEvent {
            item: drag.item,
            from: drag.origin,
            to: current,
        })
    }

    /// Where the dragged item is now, ending the drag if it is gone.
    fn locate(&self, items: &ItemCollection, drag: &ActiveDrag) -> Option<usize> {
        let current = items.index_of(&drag.item);
        if current.is_none() {
            tracing::debug!(target: targets::GESTURE, "dragged item removed mid-drag");
            let mut active = self.active.lock();
            if active.as_ref().is_some_and(|a| a.item.ptr_eq(&drag.item)) {
                *active = None;
            }
        }
        current
    }
}

/// The direction of a move from `from` to `to`.
///
/// In a single-column list only up and down exist. In a grid, a row change
/// is vertical and a move within a row is horizontal.
pub fn motion_direction(
    items: &ItemCollection,
    resolver: &SpanResolver,
    from: usize,
    to: usize,
) -> Result<Direction> {
    if resolver.columns() == 1 {
        return Ok(if to > from {
            Direction::Down
        } else {
            Direction::Up
        });
    }

    let (a, b) = resolver.cells_of(items, from, to)?;
    Ok(if a.row != b.row {
        if b.row > a.row {
            Direction::Down
        } else {
            Direction::Up
        }
    } else if b.column > a.column {
        Direction::Right
    } else {
        Direction::Left
    })
}
