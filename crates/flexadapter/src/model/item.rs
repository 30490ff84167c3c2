//! Item capabilities.
//!
//! Every row or tile shown by the adapter is an item. An item kind is a plain
//! Rust type implementing [`FlexItem`]: it declares the rendering unit type
//! it draws into, how to create one, how to bind its state into one, and its
//! span and gesture policies. The adapter stores items type-erased as
//! [`ItemHandle`]s through the object-safe [`Item`] trait, which every
//! `FlexItem` implements automatically.
//!
//! # Example
//!
//! ```
//! use flexadapter::model::{Directions, FlexItem, HostContainer, ItemHandle, RenderUnit};
//! use flexadapter_core::Property;
//!
//! #[derive(Default)]
//! struct TextView {
//!     text: String,
//! }
//!
//! impl RenderUnit for TextView {}
//!
//! struct TextItem {
//!     text: Property<String>,
//! }
//!
//! impl FlexItem for TextItem {
//!     type Unit = TextView;
//!
//!     fn create_unit(_container: &dyn HostContainer) -> TextView {
//!         TextView::default()
//!     }
//!
//!     fn bind_unit(&self, unit: &mut TextView, _position: usize) {
//!         unit.text = self.text.get();
//!     }
//!
//!     fn drag_directions(&self) -> Directions {
//!         Directions::VERTICAL
//!     }
//! }
//!
//! let handle = ItemHandle::new(TextItem { text: Property::new("Hello".into()) });
//! assert!(handle.downcast_ref::<TextItem>().is_some());
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::gesture::Directions;

/// The parent surface a rendering unit is created for.
///
/// Hosts implement this for whatever object they pass to factories.
pub trait HostContainer {
    /// Width available to a single column, if the host knows it.
    fn column_width(&self) -> Option<f32> {
        None
    }
}

/// A container with no host context, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedContainer;

impl HostContainer for DetachedContainer {}

/// A reusable visual container bound to one item at a time.
///
/// The core never inspects rendering units; it only moves them between the
/// host and the item that created them.
pub trait RenderUnit: Any + Send {}

impl dyn RenderUnit {
    /// Downcast to a concrete unit type.
    pub fn downcast_ref<T: RenderUnit>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Downcast mutably to a concrete unit type.
    pub fn downcast_mut<T: RenderUnit>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

/// Creates a fresh rendering unit for one item kind.
pub type UnitFactory = Arc<dyn Fn(&dyn HostContainer) -> Box<dyn RenderUnit> + Send + Sync>;

/// What decides which items share a kind, and so share recycled units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindKey {
    /// One kind per concrete type.
    Type(TypeId),
    /// One kind shared by every registered type using the same name.
    Shared(&'static str),
}

/// The capability set of an item kind.
///
/// Only [`create_unit`](FlexItem::create_unit) and
/// [`bind_unit`](FlexItem::bind_unit) are required. Units are recycled
/// between items of the same kind, so `create_unit` must not capture
/// per-item state and `bind_unit` must overwrite everything it displays.
pub trait FlexItem: Send + Sync + 'static {
    /// The rendering unit type this kind draws into.
    type Unit: RenderUnit;

    /// Create an unbound rendering unit inside `container`.
    fn create_unit(container: &dyn HostContainer) -> Self::Unit;

    /// Write this item's current state into `unit`, shown at `position`.
    fn bind_unit(&self, unit: &mut Self::Unit, position: usize);

    /// Number of grid columns this item occupies.
    fn span(&self) -> usize {
        1
    }

    /// Directions this item may be dragged in.
    fn drag_directions(&self) -> Directions {
        Directions::NONE
    }

    /// Directions this item may be swiped away in.
    fn swipe_directions(&self) -> Directions {
        Directions::NONE
    }

    /// An application-provided stable id, e.g. a database key.
    fn stable_id(&self) -> Option<u64> {
        None
    }
}

/// Object-safe view of a [`FlexItem`], implemented for every `FlexItem`.
pub trait Item: Any + Send + Sync {
    /// Name of the concrete item type.
    fn type_name(&self) -> &'static str;

    /// The key this item's kind is registered under.
    fn kind_key(&self) -> KindKey;

    /// The application value behind this item, for downcasting.
    fn value(&self) -> &(dyn Any + 'static);

    /// Factory for this kind's rendering units.
    fn unit_factory(&self) -> UnitFactory;

    /// Bind into `unit`. Returns `false` if `unit` is not this kind's unit type.
    fn bind_erased(&self, unit: &mut (dyn RenderUnit + 'static), position: usize) -> bool;

    /// See [`FlexItem::span`].
    fn span(&self) -> usize;

    /// See [`FlexItem::drag_directions`].
    fn drag_directions(&self) -> Directions;

    /// See [`FlexItem::swipe_directions`].
    fn swipe_directions(&self) -> Directions;

    /// See [`FlexItem::stable_id`].
    fn stable_id(&self) -> Option<u64>;
}

impl<T: FlexItem> Item for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn kind_key(&self) -> KindKey {
        KindKey::Type(TypeId::of::<T>())
    }

    fn value(&self) -> &(dyn Any + 'static) {
        self
    }

    fn unit_factory(&self) -> UnitFactory {
        Arc::new(create_boxed::<T>)
    }

    fn bind_erased(&self, unit: &mut (dyn RenderUnit + 'static), position: usize) -> bool {
        match unit.downcast_mut::<T::Unit>() {
            Some(unit) => {
                FlexItem::bind_unit(self, unit, position);
                true
            }
            None => false,
        }
    }

    fn span(&self) -> usize {
        FlexItem::span(self)
    }

    fn drag_directions(&self) -> Directions {
        FlexItem::drag_directions(self)
    }

    fn swipe_directions(&self) -> Directions {
        FlexItem::swipe_directions(self)
    }

    fn stable_id(&self) -> Option<u64> {
        FlexItem::stable_id(self)
    }
}

fn create_boxed<T: FlexItem>(container: &dyn HostContainer) -> Box<dyn RenderUnit> {
    Box::new(T::create_unit(container))
}

/// A shared, type-erased reference to an item.
///
/// Cloning a handle shares the item. Two handles are the same item only if
/// they point to the same allocation ([`ItemHandle::ptr_eq`]); items with
/// equal field values stay distinct.
#[derive(Clone)]
pub struct ItemHandle(Arc<dyn Item>);

impl ItemHandle {
    /// Wrap a new item.
    pub fn new<T: FlexItem>(item: T) -> Self {
        Self(Arc::new(item))
    }

    /// Wrap an already type-erased item.
    pub(crate) fn from_item(item: Arc<dyn Item>) -> Self {
        Self(item)
    }

    /// Share an item the application already holds.
    pub fn from_arc<T: FlexItem>(item: Arc<T>) -> Self {
        Self(item)
    }

    /// Whether both handles refer to the same item.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    /// Whether this handle refers to `item`.
    pub fn is<T: FlexItem>(&self, item: &Arc<T>) -> bool {
        self.addr() == Arc::as_ptr(item) as *const () as usize
    }

    /// The `TypeId` of the concrete item type.
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Downcast to the concrete item type, or to the registered value type
    /// for items wrapped by [`FlexAdapter::wrap`](crate::FlexAdapter::wrap).
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.value().downcast_ref::<T>()
    }

    fn as_any(&self) -> &(dyn Any + 'static) {
        let item: &dyn Item = &*self.0;
        item
    }

    /// Address of the shared allocation, used as the item's identity.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl Deref for ItemHandle {
    type Target = dyn Item;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl<T: FlexItem> From<Arc<T>> for ItemHandle {
    fn from(item: Arc<T>) -> Self {
        Self::from_arc(item)
    }
}

impl fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemHandle({} @ {:#x})", self.type_name(), self.addr())
    }
}
