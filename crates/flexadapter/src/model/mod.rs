//! The item model behind a [`FlexAdapter`](crate::FlexAdapter).
//!
//! # Core Types
//!
//! - [`FlexItem`] / [`Item`] / [`ItemHandle`]: what an item is and how it is shared
//! - [`TypeBindings`] / [`ItemAttrs`]: capabilities for plain value types
//! - [`ItemTypeRegistry`] / [`ItemKind`]: kind identities for unit recycling
//! - [`ItemCollection`] / [`StructuralChange`]: the ordered items and their change events
//! - [`diff()`]: minimal changes between two versions of a list
//! - [`SpanResolver`] / [`SpanLookup`]: grid spans
//! - [`ReorderPolicy`] and [`SwipePolicy`]: gesture handling
//!
//! # Architecture Overview
//!
//! ```text
//! ┌────────────────┐  StructuralChange  ┌─────────────┐
//! │ ItemCollection │───────────────────>│ Host widget │
//! └────────────────┘                    └─────────────┘
//!         ▲                                │       │
//!         │ move / remove       drag/swipe │       │ kind, unit, span
//!  ┌──────┴───────────────┐                │       │
//!  │ ReorderPolicy        │<───────────────┘       ▼
//!  │ SwipePolicy          │              ┌──────────────────┐
//!  └──────────────────────┘              │ ItemTypeRegistry │
//!                                        │ SpanResolver     │
//!                                        └──────────────────┘
//! ```

mod binding;
mod collection;
mod diff;
mod gesture;
mod item;
mod registry;
mod reorder;
mod span;
mod swipe;

pub use binding::{ItemAttrs, TypeBindings};
pub use collection::{CollectionSignals, ItemCollection, StructuralChange};
pub use diff::{diff, diff_by};
pub use gesture::{Direction, Directions, GestureOutcome};
pub use item::{
    DetachedContainer, FlexItem, HostContainer, Item, ItemHandle, KindKey, RenderUnit, UnitFactory,
};
pub use registry::{ItemKind, ItemTypeRegistry};
pub use reorder::{DragEvent, DragResponse, DragState, ReorderPolicy, motion_direction};
pub use span::{GridCell, SpanLookup, SpanResolver};
pub use swipe::{SwipeEvent, SwipePolicy};
