//! Mutable item fields with change detection.
//!
//! Items are shared between the adapter's collection and application code as
//! `Arc` handles, so a field that the application updates in place needs
//! interior mutability. [`Property`] provides it and reports whether a write
//! actually changed the value, which tells the caller whether a rebind
//! request is needed.
//!
//! ```
//! use flexadapter_core::Property;
//!
//! struct HeaderItem {
//!     title: Property<String>,
//! }
//!
//! let header = HeaderItem { title: Property::new("Drag".to_string()) };
//! if header.title.set("Swiped!".to_string()) {
//!     // ask the adapter to rebind the header's position
//! }
//! assert_eq!(header.title.get(), "Swiped!");
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value that can be read and replaced through a shared reference.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a property holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value`, returning `true` if it differs from the previous one.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Store `value`, returning the previous value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current == value {
            None
        } else {
            Some(std::mem::replace(&mut *current, value))
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}
