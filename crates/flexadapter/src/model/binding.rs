//! Per-type registration for values that do not implement [`FlexItem`].
//!
//! Application types often come from elsewhere (a database row, a string)
//! and cannot carry adapter capabilities themselves. Registering such a type
//! attaches span and gesture attributes, a unit factory and a binder to it;
//! [`TypeBindings::wrap`] then turns a value of that type into an ordinary
//! [`ItemHandle`].
//!
//! By default every registered type is its own kind. Types registered with
//! the same [`ItemAttrs::shared_kind`] name share one kind, and so share
//! recycled rendering units; they must then also share the unit type.
//!
//! [`FlexItem`]: super::item::FlexItem

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use flexadapter_core::logging::targets;
use flexadapter_core::{AdapterError, Result};

use super::gesture::Directions;
use super::item::{HostContainer, Item, ItemHandle, KindKey, RenderUnit, UnitFactory};

/// Layout and gesture attributes attached to a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAttrs {
    /// Number of grid columns each value occupies.
    pub span: usize,
    /// Directions values may be dragged in.
    pub drag: Directions,
    /// Directions values may be swiped away in.
    pub swipe: Directions,
    /// Name of a kind shared with other registered types.
    pub shared_kind: Option<&'static str>,
}

impl Default for ItemAttrs {
    fn default() -> Self {
        Self {
            span: 1,
            drag: Directions::NONE,
            swipe: Directions::NONE,
            shared_kind: None,
        }
    }
}

impl ItemAttrs {
    /// Attributes with span 1 and no gestures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the span.
    pub fn span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    /// Set the drag directions.
    pub fn drag(mut self, drag: Directions) -> Self {
        self.drag = drag;
        self
    }

    /// Set the swipe directions.
    pub fn swipe(mut self, swipe: Directions) -> Self {
        self.swipe = swipe;
        self
    }

    /// Share one kind with every other type registered under `name`.
    pub fn shared_kind(mut self, name: &'static str) -> Self {
        self.shared_kind = Some(name);
        self
    }
}

type Binder<T, U> = dyn Fn(&T, &mut U, usize) + Send + Sync;

struct Binding<T, U> {
    attrs: ItemAttrs,
    create: Arc<dyn Fn(&dyn HostContainer) -> U + Send + Sync>,
    bind: Box<Binder<T, U>>,
}

/// A registered value together with the binding it was wrapped with.
struct Bound<T, U> {
    value: T,
    binding: Arc<Binding<T, U>>,
}

impl<T, U> Item for Bound<T, U>
where
    T: Send + Sync + 'static,
    U: RenderUnit,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn kind_key(&self) -> KindKey {
        match self.binding.attrs.shared_kind {
            Some(name) => KindKey::Shared(name),
            None => KindKey::Type(TypeId::of::<Self>()),
        }
    }

    fn value(&self) -> &(dyn Any + 'static) {
        &self.value
    }

    fn unit_factory(&self) -> UnitFactory {
        let create = self.binding.create.clone();
        Arc::new(move |container: &dyn HostContainer| {
            Box::new(create(container)) as Box<dyn RenderUnit>
        })
    }

    fn bind_erased(&self, unit: &mut (dyn RenderUnit + 'static), position: usize) -> bool {
        match unit.downcast_mut::<U>() {
            Some(unit) => {
                (self.binding.bind)(&self.value, unit, position);
                true
            }
            None => false,
        }
    }

    fn span(&self) -> usize {
        self.binding.attrs.span
    }

    fn drag_directions(&self) -> Directions {
        self.binding.attrs.drag
    }

    fn swipe_directions(&self) -> Directions {
        self.binding.attrs.swipe
    }

    fn stable_id(&self) -> Option<u64> {
        None
    }
}

type Wrapper<T> = Arc<dyn Fn(T) -> ItemHandle + Send + Sync>;

/// Registered types, keyed by the value type.
#[derive(Default)]
pub struct TypeBindings {
    wrappers: Mutex<HashMap<TypeId, (&'static str, Box<dyn Any + Send + Sync>)>>,
}

impl TypeBindings {
    /// Create an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`, drawn into units of type `U`.
    ///
    /// Registering a type again replaces its attributes and binder for
    /// values wrapped afterwards; already wrapped values keep theirs.
    pub fn register<T, U, C, B>(&self, attrs: ItemAttrs, create: C, bind: B)
    where
        T: Send + Sync + 'static,
        U: RenderUnit,
        C: Fn(&dyn HostContainer) -> U + Send + Sync + 'static,
        B: Fn(&T, &mut U, usize) + Send + Sync + 'static,
    {
        let binding = Arc::new(Binding {
            attrs,
            create: Arc::new(create),
            bind: Box::new(bind),
        });
        let wrapper: Wrapper<T> = Arc::new(move |value: T| {
            ItemHandle::from_item(Arc::new(Bound {
                value,
                binding: binding.clone(),
            }))
        });

        let type_name = std::any::type_name::<T>();
        tracing::debug!(target: targets::REGISTRY, type_name, ?attrs, "registered value type");
        self.wrappers
            .lock()
            .insert(TypeId::of::<T>(), (type_name, Box::new(wrapper)));
    }

    /// Whether `T` has been registered.
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.wrappers.lock().contains_key(&TypeId::of::<T>())
    }

    /// Wrap `value` into an item using its type's registration.
    pub fn wrap<T: Send + Sync + 'static>(&self, value: T) -> Result<ItemHandle> {
        let wrapper = self
            .wrappers
            .lock()
            .get(&TypeId::of::<T>())
            .and_then(|(_, wrapper)| wrapper.downcast_ref::<Wrapper<T>>())
            .cloned()
            .ok_or(AdapterError::Unregistered(std::any::type_name::<T>()))?;
        Ok(wrapper(value))
    }
}

impl fmt::Debug for TypeBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.wrappers.lock().values().map(|(name, _)| *name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::DetachedContainer;

    #[derive(Default)]
    struct Label {
        text: String,
    }

    impl RenderUnit for Label {}

    struct Photo {
        name: &'static str,
    }

    #[test]
    fn test_wrap_registered_value() {
        let bindings = TypeBindings::new();
        bindings.register::<Photo, Label, _, _>(
            ItemAttrs::new().span(2).swipe(Directions::HORIZONTAL),
            |_| Label::default(),
            |photo, label, position| label.text = format!("{} at {position}", photo.name),
        );
        assert!(bindings.is_registered::<Photo>());

        let item = bindings.wrap(Photo { name: "car" }).unwrap();
        assert_eq!(item.span(), 2);
        assert_eq!(item.swipe_directions(), Directions::HORIZONTAL);
        assert!(item.drag_directions().is_empty());
        assert!(item.type_name().ends_with("Photo"));
        assert_eq!(item.downcast_ref::<Photo>().map(|p| p.name), Some("car"));

        let mut unit = (item.unit_factory())(&DetachedContainer);
        assert!(item.bind_erased(&mut *unit, 4));
        assert_eq!(unit.downcast_ref::<Label>().unwrap().text, "car at 4");
    }

    #[test]
    fn test_unregistered_type() {
        let bindings = TypeBindings::new();
        let err = bindings.wrap(Photo { name: "x" }).unwrap_err();
        assert!(matches!(err, AdapterError::Unregistered(name) if name.ends_with("Photo")));
    }

    #[test]
    fn test_kind_keys() {
        let bindings = TypeBindings::new();
        bindings.register::<Photo, Label, _, _>(ItemAttrs::new(), |_| Label::default(), |_, _, _| {});
        bindings.register::<String, Label, _, _>(
            ItemAttrs::new().shared_kind("label"),
            |_| Label::default(),
            |text, label, _| label.text = text.clone(),
        );
        bindings.register::<u32, Label, _, _>(
            ItemAttrs::new().shared_kind("label"),
            |_| Label::default(),
            |n, label, _| label.text = n.to_string(),
        );

        let photo = bindings.wrap(Photo { name: "a" }).unwrap();
        let text = bindings.wrap("b".to_string()).unwrap();
        let number = bindings.wrap(7u32).unwrap();

        assert_eq!(text.kind_key(), KindKey::Shared("label"));
        assert_eq!(text.kind_key(), number.kind_key());
        assert_ne!(photo.kind_key(), text.kind_key());

        // A unit made for one shared type binds the other.
        let mut unit = (text.unit_factory())(&DetachedContainer);
        assert!(number.bind_erased(&mut *unit, 0));
        assert_eq!(unit.downcast_ref::<Label>().unwrap().text, "7");
    }

    #[test]
    fn test_reregistering_replaces_attributes() {
        let bindings = TypeBindings::new();
        bindings.register::<Photo, Label, _, _>(ItemAttrs::new(), |_| Label::default(), |_, _, _| {});
        let before = bindings.wrap(Photo { name: "a" }).unwrap();

        bindings.register::<Photo, Label, _, _>(
            ItemAttrs::new().drag(Directions::ALL),
            |_| Label::default(),
            |_, _, _| {},
        );
        let after = bindings.wrap(Photo { name: "b" }).unwrap();

        assert!(before.drag_directions().is_empty());
        assert_eq!(after.drag_directions(), Directions::ALL);
        assert_eq!(before.kind_key(), after.kind_key());
    }
}
