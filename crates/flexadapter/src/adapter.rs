//! The adapter facade.
//!
//! [`FlexAdapter`] ties the item collection to a host widget. Application
//! code mutates [`FlexAdapter::items`]; the host calls the realization
//! methods to create and bind rendering units, asks
//! [`FlexAdapter::span_lookup`] how wide each item is, and reports drag and
//! swipe gestures, which the adapter validates against each item's policy
//! and turns into collection mutations.
//!
//! # Example
//!
//! ```
//! use flexadapter::prelude::*;
//!
//! #[derive(Default)]
//! struct Row {
//!     text: String,
//! }
//! impl RenderUnit for Row {}
//!
//! struct Message(&'static str);
//!
//! impl FlexItem for Message {
//!     type Unit = Row;
//!
//!     fn create_unit(_: &dyn HostContainer) -> Row {
//!         Row::default()
//!     }
//!
//!     fn bind_unit(&self, unit: &mut Row, _position: usize) {
//!         unit.text = self.0.to_string();
//!     }
//!
//!     fn swipe_directions(&self) -> Directions {
//!         Directions::HORIZONTAL
//!     }
//! }
//!
//! let adapter = FlexAdapter::default();
//! adapter.items().extend([ItemHandle::new(Message("hello")), ItemHandle::new(Message("bye"))]);
//! adapter.set_swipe_listener(|adapter, event| {
//!     println!("dismissed {:?}, {} left", event.item, adapter.items().len());
//! });
//!
//! let kind = adapter.item_kind(0).unwrap();
//! let mut unit = adapter.create_unit(kind, &DetachedContainer).unwrap();
//! adapter.bind_unit(&mut unit, 0).unwrap();
//! assert_eq!(unit.downcast_ref::<Row>().unwrap().text, "hello");
//!
//! assert!(adapter.swipe(1, Direction::Left).unwrap().is_accepted());
//! assert_eq!(adapter.items().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use flexadapter_core::logging::{span_names, targets};
use flexadapter_core::{AdapterError, ConnectionId, PerfSpan, Result};

use crate::config::AdapterConfig;
use crate::host::HostWidget;
use crate::model::{
    Direction, DragEvent, DragResponse, DragState, GestureOutcome, HostContainer, ItemAttrs,
    ItemCollection, ItemHandle, ItemKind, ItemTypeRegistry, RenderUnit, ReorderPolicy, SpanLookup,
    SpanResolver, SwipeEvent, SwipePolicy, TypeBindings,
};

/// Called after an item has been swiped away.
pub type SwipeListener = Arc<dyn Fn(&FlexAdapter, &SwipeEvent) + Send + Sync>;

/// Called when a drag reorders the collection.
pub type DragListener = Arc<dyn Fn(&FlexAdapter, &DragEvent) + Send + Sync>;

/// A rendering unit together with the kind it was created for.
pub struct RealizedUnit {
    kind: ItemKind,
    unit: Box<dyn RenderUnit>,
}

impl RealizedUnit {
    /// The kind this unit was created for.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The unit.
    pub fn unit(&self) -> &(dyn RenderUnit + 'static) {
        &*self.unit
    }

    /// The unit, mutably.
    pub fn unit_mut(&mut self) -> &mut (dyn RenderUnit + 'static) {
        &mut *self.unit
    }

    /// Downcast to the concrete unit type.
    pub fn downcast_ref<T: RenderUnit>(&self) -> Option<&T> {
        self.unit.downcast_ref::<T>()
    }

    /// Downcast mutably to the concrete unit type.
    pub fn downcast_mut<T: RenderUnit>(&mut self) -> Option<&mut T> {
        self.unit.downcast_mut::<T>()
    }

    /// Take the unit out.
    pub fn into_inner(self) -> Box<dyn RenderUnit> {
        self.unit
    }
}

impl fmt::Debug for RealizedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealizedUnit").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// A heterogeneous list/grid adapter.
///
/// Every method takes `&self`. No internal lock is held while listeners or
/// hosts are called, so they may freely call back into the adapter.
pub struct FlexAdapter {
    config: AdapterConfig,
    items: Arc<ItemCollection>,
    registry: Mutex<ItemTypeRegistry>,
    bindings: TypeBindings,
    spans: SpanResolver,
    reorder: ReorderPolicy,
    swipe: SwipePolicy,
    swipe_listener: Mutex<Option<SwipeListener>>,
    drag_listener: Mutex<Option<DragListener>>,
}

impl Default for FlexAdapter {
    fn default() -> Self {
        Self::build(AdapterConfig::default())
    }
}

impl FlexAdapter {
    /// Create an adapter with `config`.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a grid adapter with `columns` columns and default settings.
    pub fn with_columns(columns: usize) -> Result<Self> {
        Self::new(AdapterConfig::new().columns(columns))
    }

    fn build(config: AdapterConfig) -> Self {
        tracing::debug!(target: targets::ADAPTER, ?config, "creating adapter");
        Self {
            items: Arc::new(ItemCollection::new()),
            registry: Mutex::new(ItemTypeRegistry::new()),
            bindings: TypeBindings::new(),
            spans: SpanResolver::new(config.columns),
            reorder: ReorderPolicy::new(
                config.drag_listener_on_drop_only,
                config.rollback_drag_on_cancel,
            ),
            swipe: SwipePolicy::new(),
            swipe_listener: Mutex::new(None),
            drag_listener: Mutex::new(None),
            config,
        }
    }

    /// The configuration the adapter was created with.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// The backing collection.
    pub fn items(&self) -> &Arc<ItemCollection> {
        &self.items
    }

    /// The span-lookup callback for the host's grid layout.
    pub fn span_lookup(&self) -> SpanLookup {
        SpanLookup::new(self.items.clone(), self.spans)
    }

    /// The span resolver.
    pub fn span_resolver(&self) -> &SpanResolver {
        &self.spans
    }

    // -------------------------------------------------------------------------
    // Host wiring
    // -------------------------------------------------------------------------

    /// Forward every structural change to `host`.
    pub fn attach_host(&self, host: Arc<dyn HostWidget>) -> ConnectionId {
        tracing::debug!(target: targets::ADAPTER, "host attached");
        self.items
            .signals()
            .changed
            .connect(move |change| host.on_structural_change(change))
    }

    /// Stop forwarding changes to a host attached with [`attach_host`](Self::attach_host).
    pub fn detach_host(&self, id: ConnectionId) -> bool {
        self.items.signals().changed.disconnect(id)
    }

    // -------------------------------------------------------------------------
    // Value types
    // -------------------------------------------------------------------------

    /// Register a value type that does not implement
    /// [`FlexItem`](crate::model::FlexItem).
    ///
    /// `attrs` gives every value of `T` its span and gesture directions,
    /// `create` makes its rendering units and `bind` writes a value into one.
    /// Values are turned into items with [`wrap`](Self::wrap).
    ///
    /// ```
    /// use flexadapter::prelude::*;
    ///
    /// #[derive(Default)]
    /// struct Label(String);
    /// impl RenderUnit for Label {}
    ///
    /// let adapter = FlexAdapter::default();
    /// adapter.register::<String, Label, _, _>(
    ///     ItemAttrs::new().swipe(Directions::HORIZONTAL),
    ///     |_| Label::default(),
    ///     |text, label, _| label.0 = text.clone(),
    /// );
    /// adapter.items().push(adapter.wrap("hello".to_string()).unwrap());
    /// assert!(adapter.swipe(0, Direction::Left).unwrap().is_accepted());
    /// ```
    pub fn register<T, U, C, B>(&self, attrs: ItemAttrs, create: C, bind: B)
    where
        T: Send + Sync + 'static,
        U: RenderUnit,
        C: Fn(&dyn HostContainer) -> U + Send + Sync + 'static,
        B: Fn(&T, &mut U, usize) + Send + Sync + 'static,
    {
        self.bindings.register(attrs, create, bind);
    }

    /// Wrap `value` of a registered type into an item.
    ///
    /// Fails with [`AdapterError::Unregistered`] if `T` was never registered.
    pub fn wrap<T: Send + Sync + 'static>(&self, value: T) -> Result<ItemHandle> {
        self.bindings.wrap(value)
    }

    // -------------------------------------------------------------------------
    // Realization
    // -------------------------------------------------------------------------

    /// The kind of the item at `index`.
    pub fn item_kind(&self, index: usize) -> Result<ItemKind> {
        let item = self.item_at(index)?;
        Ok(self.registry.lock().kind_of(&*item))
    }

    /// Number of item kinds seen so far.
    pub fn kind_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Create a fresh rendering unit for `kind` inside `container`.
    pub fn create_unit(&self, kind: ItemKind, container: &dyn HostContainer) -> Result<RealizedUnit> {
        let factory = self.registry.lock().factory(kind)?;
        let _span = PerfSpan::new(span_names::REALIZE, self.items.len());
        tracing::trace!(target: targets::ADAPTER, %kind, "creating rendering unit");
        Ok(RealizedUnit {
            kind,
            unit: factory(container),
        })
    }

    /// Bind the item at `index` into `unit`.
    ///
    /// Fails with [`AdapterError::UnitMismatch`] if `unit` was created for a
    /// different kind.
    pub fn bind_unit(&self, unit: &mut RealizedUnit, index: usize) -> Result<()> {
        let item = self.item_at(index)?;
        let kind = self.registry.lock().kind_of(&*item);
        let unit_kind = unit.kind;
        let mismatch = || AdapterError::UnitMismatch {
            unit_kind: unit_kind.raw(),
            item_kind: kind.raw(),
            item_type: item.type_name(),
        };
        if kind != unit_kind {
            return Err(mismatch());
        }
        if !item.bind_erased(&mut *unit.unit, index) {
            return Err(mismatch());
        }
        tracing::trace!(target: targets::ADAPTER, index, %kind, "bound rendering unit");
        Ok(())
    }

    /// The stable id of the item at `index`.
    ///
    /// Items without an id of their own get one derived from their identity,
    /// which stays the same for as long as the item is alive.
    pub fn item_id(&self, index: usize) -> Result<u64> {
        let item = self.item_at(index)?;
        Ok(item.stable_id().unwrap_or(item.addr() as u64))
    }

    // -------------------------------------------------------------------------
    // Rebinding
    // -------------------------------------------------------------------------

    /// Ask the host to rebind the item at `index`.
    pub fn mark_changed(&self, index: usize) -> Result<()> {
        self.items.mark_changed(index)
    }

    /// Ask the host to rebind `item`. Returns `false` if it is not in the
    /// collection.
    pub fn mark_item_changed(&self, item: &ItemHandle) -> bool {
        match self.items.index_of(item) {
            Some(index) => self.items.mark_changed(index).is_ok(),
            None => {
                tracing::debug!(target: targets::ADAPTER, ?item, "rebind requested for absent item");
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register the swipe listener, replacing and returning the previous one.
    pub fn set_swipe_listener<F>(&self, listener: F) -> Option<SwipeListener>
    where
        F: Fn(&FlexAdapter, &SwipeEvent) + Send + Sync + 'static,
    {
        self.swipe_listener.lock().replace(Arc::new(listener))
    }

    /// Remove the swipe listener.
    pub fn clear_swipe_listener(&self) -> Option<SwipeListener> {
        self.swipe_listener.lock().take()
    }

    /// Register the drag listener, replacing and returning the previous one.
    pub fn set_drag_listener<F>(&self, listener: F) -> Option<DragListener>
    where
        F: Fn(&FlexAdapter, &DragEvent) + Send + Sync + 'static,
    {
        self.drag_listener.lock().replace(Arc::new(listener))
    }

    /// Remove the drag listener.
    pub fn clear_drag_listener(&self) -> Option<DragListener> {
        self.drag_listener.lock().take()
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// The host picked up the item at `index`.
    pub fn drag_start(&self, index: usize) -> Result<GestureOutcome> {
        let response = self.reorder.start(&self.items, index)?;
        Ok(self.finish_drag(response))
    }

    /// The dragged item is over `target`.
    pub fn drag_over(&self, target: usize) -> Result<GestureOutcome> {
        let response = self.reorder.over(&self.items, &self.spans, target)?;
        Ok(self.finish_drag(response))
    }

    /// The dragged item was dropped.
    pub fn drag_end(&self) -> GestureOutcome {
        let response = self.reorder.end(&self.items);
        self.finish_drag(response)
    }

    /// The host aborted the drag.
    pub fn drag_cancel(&self) -> Result<GestureOutcome> {
        let response = self.reorder.cancel(&self.items)?;
        Ok(self.finish_drag(response))
    }

    /// The current drag state.
    pub fn drag_state(&self) -> DragState {
        self.reorder.state()
    }

    /// The item at `index` was swiped in `direction`.
    ///
    /// If the item allows it, the item is removed and the swipe listener is
    /// then called with the removed item.
    pub fn swipe(&self, index: usize, direction: Direction) -> Result<GestureOutcome> {
        let Some(event) = self.swipe.dismiss(&self.items, index, direction)? else {
            return Ok(GestureOutcome::Rejected);
        };
        let listener = self.swipe_listener.lock().clone();
        if let Some(listener) = listener {
            listener(self, &event);
        }
        Ok(GestureOutcome::Accepted)
    }

    fn finish_drag(&self, response: DragResponse) -> GestureOutcome {
        if let Some(event) = response.event {
            let listener = self.drag_listener.lock().clone();
            if let Some(listener) = listener {
                listener(self, &event);
            }
        }
        response.outcome
    }

    fn item_at(&self, index: usize) -> Result<ItemHandle> {
        self.items
            .get(index)
            .ok_or_else(|| AdapterError::out_of_range(index, self.items.len()))
    }
}

impl fmt::Debug for FlexAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlexAdapter")
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("kinds", &*self.registry.lock())
            .field("registered", &self.bindings)
            .field("drag", &self.reorder.state())
            .finish()
    }
}

impl fmt::Display for FlexAdapter {
    /// One line per position: index, kind name and span.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.items.snapshot().iter().enumerate() {
            writeln!(
                f,
                "{index:>3} {} (span {})",
                item.type_name(),
                self.spans.resolve(&**item)
            )?;
        }
        Ok(())
    }
}
