//! Item kind registry.
//!
//! Host widgets recycle rendering units per kind: a unit created for one item
//! may be rebound to any other item of the same kind. [`ItemTypeRegistry`]
//! hands out the small integer kind ids the host keys its recycling pool
//! with. Kinds are discovered lazily the first time an item with a new
//! [`KindKey`] is seen, and never forgotten. Items implementing `FlexItem`
//! are keyed by their concrete type; registered value types may share a key.

use std::collections::HashMap;
use std::fmt;

use flexadapter_core::logging::targets;
use flexadapter_core::{AdapterError, Result};

use super::item::{Item, KindKey, UnitFactory};

/// A stable small-integer identity for an item kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKind(u32);

impl ItemKind {
    /// Create a kind id from a raw value, e.g. one round-tripped through the host.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemKind({})", self.0)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct KindEntry {
    type_name: &'static str,
    factory: UnitFactory,
}

/// Maps kind keys to [`ItemKind`]s.
#[derive(Default)]
pub struct ItemTypeRegistry {
    by_key: HashMap<KindKey, ItemKind>,
    entries: Vec<KindEntry>,
}

impl ItemTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The kind of `item`, registering its kind key on first sight.
    pub fn kind_of(&mut self, item: &dyn Item) -> ItemKind {
        let key = item.kind_key();
        if let Some(kind) = self.by_key.get(&key) {
            return *kind;
        }

        let kind = ItemKind(self.entries.len() as u32);
        self.entries.push(KindEntry {
            type_name: item.type_name(),
            factory: item.unit_factory(),
        });
        self.by_key.insert(key, kind);
        tracing::debug!(
            target: targets::REGISTRY,
            kind = kind.raw(),
            type_name = item.type_name(),
            "registered item kind"
        );
        kind
    }

    /// The kind of `item` if its key has already been registered.
    pub fn lookup(&self, item: &dyn Item) -> Option<ItemKind> {
        self.by_key.get(&item.kind_key()).copied()
    }

    /// The rendering-unit factory for `kind`.
    pub fn factory(&self, kind: ItemKind) -> Result<UnitFactory> {
        self.entry(kind).map(|entry| entry.factory.clone())
    }

    /// The type name of the first item seen with `kind`.
    pub fn type_name(&self, kind: ItemKind) -> Result<&'static str> {
        self.entry(kind).map(|entry| entry.type_name)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no kind has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, kind: ItemKind) -> Result<&KindEntry> {
        self.entries
            .get(kind.0 as usize)
            .ok_or(AdapterError::UnknownKind(kind.0))
    }
}

impl fmt::Debug for ItemTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .enumerate()
                    .map(|(raw, entry)| (raw, entry.type_name)),
            )
            .finish()
    }
}
