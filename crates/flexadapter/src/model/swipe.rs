//! Swipe-to-dismiss.

use flexadapter_core::logging::targets;
use flexadapter_core::{AdapterError, Result};

use super::collection::ItemCollection;
use super::gesture::Direction;
use super::item::ItemHandle;

/// A completed swipe-dismiss, delivered after the item has been removed.
#[derive(Debug, Clone)]
pub struct SwipeEvent {
    /// The removed item.
    pub item: ItemHandle,
    /// The direction it was swiped in.
    pub direction: Direction,
    /// The position it occupied.
    pub index: usize,
}

/// Converts swipe reports into removals.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwipePolicy;

impl SwipePolicy {
    /// Create the policy.
    pub fn new() -> Self {
        Self
    }

    /// Remove the item at `index` if it may be swiped in `direction`.
    ///
    /// Returns `None` when the item's policy forbids the direction; nothing
    /// is mutated in that case.
    pub fn dismiss(
        &self,
        items: &ItemCollection,
        index: usize,
        direction: Direction,
    ) -> Result<Option<SwipeEvent>> {
        let item = items
            .get(index)
            .ok_or_else(|| AdapterError::out_of_range(index, items.len()))?;

        if !item.swipe_directions().allows(direction) {
            tracing::trace!(
                target: targets::GESTURE,
                index,
                %direction,
                item = item.type_name(),
                "swipe direction not allowed"
            );
            return Ok(None);
        }

        items.remove(index)?;
        tracing::debug!(target: targets::GESTURE, index, %direction, "item swiped away");
        Ok(Some(SwipeEvent {
            item,
            direction,
            index,
        }))
    }
}
