//! The ordered item collection.
//!
//! [`ItemCollection`] is the single source of truth for what the host shows
//! and in what order. Every mutation reports the smallest structural change
//! that describes it through [`CollectionSignals`], so the host can rebind
//! only the affected positions instead of redrawing the whole list.
//!
//! Observers are called synchronously, with no lock held, after the change
//! has been applied. A slot may mutate the collection; the change it makes
//! is delivered to every slot after the change being reported, so all
//! observers see changes in the order they were made.
//!
//! # Example
//!
//! ```
//! use flexadapter::model::{FlexItem, HostContainer, ItemCollection, ItemHandle, RenderUnit, StructuralChange};
//!
//! struct Unit;
//! impl RenderUnit for Unit {}
//!
//! struct Row(&'static str);
//! impl FlexItem for Row {
//!     type Unit = Unit;
//!     fn create_unit(_: &dyn HostContainer) -> Unit { Unit }
//!     fn bind_unit(&self, _: &mut Unit, _: usize) {}
//! }
//!
//! let items = ItemCollection::new();
//! items.signals().changed.connect(|change| println!("{change}"));
//!
//! items.extend([ItemHandle::new(Row("a")), ItemHandle::new(Row("b"))]);
//! items.move_item(0, 1).unwrap();
//! assert_eq!(items.len(), 2);
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use parking_lot::{Mutex, RwLock};

use flexadapter_core::logging::{span_names, targets};
use flexadapter_core::{AdapterError, PerfSpan, Result, Signal};

use super::diff::diff_by;
use super::item::ItemHandle;

/// A structural change to the collection.
///
/// Applying every change, in delivery order, to a copy of the collection
/// taken before the first one yields the collection after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralChange {
    /// `count` items were inserted, the first now at `index`.
    Inserted { index: usize, count: usize },
    /// `count` items that started at `index` were removed.
    Removed { index: usize, count: usize },
    /// The item at `from` was moved to `to`; nothing needs rebinding.
    Moved { from: usize, to: usize },
    /// `count` items starting at `index` need rebinding.
    Changed { index: usize, count: usize },
    /// The whole collection must be re-read.
    Reset,
}

impl StructuralChange {
    /// Apply this change to `shadow`.
    ///
    /// `current` is the collection right after this change, which is what a
    /// slot observes unless it or an earlier slot mutated the collection
    /// again; inserted, changed and reset content is copied from it.
    pub fn replay<T: Clone>(&self, shadow: &mut Vec<T>, current: &[T]) {
        match *self {
            Self::Inserted { index, count } => {
                let inserted = current[index..index + count].iter().cloned();
                shadow.splice(index..index, inserted);
            }
            Self::Removed { index, count } => {
                shadow.drain(index..index + count);
            }
            Self::Moved { from, to } => {
                let moved = shadow.remove(from);
                shadow.insert(to, moved);
            }
            Self::Changed { index, count } => {
                shadow[index..index + count].clone_from_slice(&current[index..index + count]);
            }
            Self::Reset => {
                *shadow = current.to_vec();
            }
        }
    }
}

impl fmt::Display for StructuralChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted { index, count } => write!(f, "inserted {count} at {index}"),
            Self::Removed { index, count } => write!(f, "removed {count} at {index}"),
            Self::Moved { from, to } => write!(f, "moved {from} -> {to}"),
            Self::Changed { index, count } => write!(f, "changed {count} at {index}"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// Signals emitted by an [`ItemCollection`].
#[derive(Default)]
pub struct CollectionSignals {
    /// Emitted after a change has been applied.
    pub changed: Signal<StructuralChange>,
}

impl CollectionSignals {
    /// Create a new set of signals.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Changes waiting to be delivered, in mutation order.
#[derive(Default)]
struct Outbox {
    pending: VecDeque<StructuralChange>,
    delivering: bool,
}

/// An ordered, index-addressable sequence of items.
///
/// Items are compared by reference: two handles to distinct items with
/// equal contents are different elements. All methods take `&self`; the
/// inner lock is never held while a signal is emitted, so slots may call
/// back into the collection.
///
/// Index checks happen under the same lock as the mutation they guard.
/// Changes are queued under that lock too and delivered one at a time, so
/// every slot sees every change in mutation order, including changes made
/// by other slots while a change is being delivered.
pub struct ItemCollection {
    items: RwLock<Vec<ItemHandle>>,
    signals: CollectionSignals,
    outbox: Mutex<Outbox>,
    notifications: AtomicBool,
}

impl Default for ItemCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a collection holding `items`.
    pub fn with_items(items: Vec<ItemHandle>) -> Self {
        Self {
            items: RwLock::new(items),
            signals: CollectionSignals::new(),
            outbox: Mutex::new(Outbox::default()),
            notifications: AtomicBool::new(true),
        }
    }

    /// The collection's signals.
    pub fn signals(&self) -> &CollectionSignals {
        &self.signals
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// The item at `index`.
    pub fn get(&self, index: usize) -> Option<ItemHandle> {
        self.items.read().get(index).cloned()
    }

    /// The position of `item`, compared by reference.
    pub fn index_of(&self, item: &ItemHandle) -> Option<usize> {
        self.items.read().iter().position(|it| it.ptr_eq(item))
    }

    /// Whether `item` is in the collection, compared by reference.
    pub fn contains(&self, item: &ItemHandle) -> bool {
        self.index_of(item).is_some()
    }

    /// A copy of the current sequence of handles.
    pub fn snapshot(&self) -> Vec<ItemHandle> {
        self.items.read().clone()
    }

    /// Run `f` on the current sequence under one read lock.
    ///
    /// `f` must not mutate the collection.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[ItemHandle]) -> R,
    {
        f(&self.items.read())
    }

    // -------------------------------------------------------------------------
    // Single-item mutations
    // -------------------------------------------------------------------------

    /// Append an item.
    pub fn push(&self, item: ItemHandle) {
        self.append(vec![item]);
    }

    /// Insert an item at `index`, shifting later items.
    pub fn insert(&self, index: usize, item: ItemHandle) -> Result<()> {
        self.commit(|items, changes| {
            check_insert_at(index, items.len())?;
            items.insert(index, item);
            changes.push(StructuralChange::Inserted { index, count: 1 });
            Ok(())
        })
    }

    /// Remove and return the item at `index`.
    pub fn remove(&self, index: usize) -> Result<ItemHandle> {
        self.commit(|items, changes| {
            AdapterError::check_index(index, items.len())?;
            changes.push(StructuralChange::Removed { index, count: 1 });
            Ok(items.remove(index))
        })
    }

    /// Remove `item`, compared by reference. Returns the index it occupied.
    pub fn remove_item(&self, item: &ItemHandle) -> Option<usize> {
        self.commit(|items, changes| {
            let index = items.iter().position(|it| it.ptr_eq(item))?;
            items.remove(index);
            changes.push(StructuralChange::Removed { index, count: 1 });
            Some(index)
        })
    }

    /// Move the item at `from` so that it ends up at `to`.
    ///
    /// Moving an item onto its own position does nothing.
    pub fn move_item(&self, from: usize, to: usize) -> Result<()> {
        self.commit(|items, changes| {
            AdapterError::check_index(from, items.len())?;
            AdapterError::check_index(to, items.len())?;
            if from != to {
                let moved = items.remove(from);
                items.insert(to, moved);
                changes.push(StructuralChange::Moved { from, to });
            }
            Ok(())
        })
    }

    /// Replace the item at `index`, returning the previous one.
    pub fn replace(&self, index: usize, item: ItemHandle) -> Result<ItemHandle> {
        self.commit(|items, changes| {
            AdapterError::check_index(index, items.len())?;
            changes.push(StructuralChange::Changed { index, count: 1 });
            Ok(std::mem::replace(&mut items[index], item))
        })
    }

    /// Request a rebind of the item at `index` without any structural change.
    ///
    /// Call this after mutating an item's fields in place.
    pub fn mark_changed(&self, index: usize) -> Result<()> {
        self.commit(|items, changes| {
            AdapterError::check_index(index, items.len())?;
            changes.push(StructuralChange::Changed { index, count: 1 });
            Ok(())
        })
    }

    // -------------------------------------------------------------------------
    // Bulk mutations
    // -------------------------------------------------------------------------

    /// Append every item of `items`, reported as one insertion.
    pub fn extend<I>(&self, items: I)
    where
        I: IntoIterator<Item = ItemHandle>,
    {
        self.append(items.into_iter().collect());
    }

    /// Insert `items` at `index`, reported as one insertion.
    pub fn insert_all(&self, index: usize, new: Vec<ItemHandle>) -> Result<()> {
        self.commit(|items, changes| {
            check_insert_at(index, items.len())?;
            if !new.is_empty() {
                changes.push(StructuralChange::Inserted {
                    index,
                    count: new.len(),
                });
                items.splice(index..index, new);
            }
            Ok(())
        })
    }

    /// Remove the items in `range`, reported as one removal.
    pub fn remove_range(&self, range: Range<usize>) -> Result<Vec<ItemHandle>> {
        self.commit(|items, changes| {
            let len = items.len();
            if range.end > len {
                return Err(AdapterError::out_of_range(range.end, len));
            }
            if range.start > range.end {
                return Err(AdapterError::out_of_range(range.start, len));
            }
            if !range.is_empty() {
                changes.push(StructuralChange::Removed {
                    index: range.start,
                    count: range.len(),
                });
            }
            Ok(items.drain(range).collect())
        })
    }

    /// Remove every item.
    pub fn clear(&self) {
        self.commit(|items, changes| {
            if !items.is_empty() {
                changes.push(StructuralChange::Removed {
                    index: 0,
                    count: items.len(),
                });
                items.clear();
            }
        });
    }

    /// Replace the whole content with `items`, reported as a reset.
    pub fn reset(&self, new: Vec<ItemHandle>) {
        let _span = PerfSpan::new(span_names::BULK, new.len());
        self.commit(|items, changes| {
            *items = new;
            changes.push(StructuralChange::Reset);
        });
    }

    /// Replace the whole content with `items`, reporting the minimal changes.
    ///
    /// Contents of items of the same kind are compared by reference; see
    /// [`assign_by`](Self::assign_by) to compare them by value.
    pub fn assign(&self, new: Vec<ItemHandle>) {
        self.assign_by(new, ItemHandle::ptr_eq);
    }

    /// Replace the whole content with `items`, reporting the changes
    /// computed by [`diff_by`].
    ///
    /// `same_contents` runs with the collection locked and must not call
    /// back into it.
    pub fn assign_by<F>(&self, new: Vec<ItemHandle>, same_contents: F)
    where
        F: FnMut(&ItemHandle, &ItemHandle) -> bool,
    {
        let _span = PerfSpan::new(span_names::BULK, new.len());
        self.commit(|items, changes| {
            changes.extend(diff_by(items, &new, same_contents));
            *items = new;
        });
    }

    /// Keep only the items for which `keep` returns `true`.
    ///
    /// Returns the number of removed items. Each contiguous run of removed
    /// items is reported as one removal, last run first. `keep` runs with
    /// the collection locked and must not call back into it.
    pub fn retain<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(&ItemHandle) -> bool,
    {
        self.commit(|items, changes| {
            let _span = PerfSpan::new(span_names::BULK, items.len());
            let kept: Vec<bool> = items.iter().map(&mut keep).collect();

            let mut end = kept.len();
            while end > 0 {
                if kept[end - 1] {
                    end -= 1;
                    continue;
                }
                let mut start = end;
                while start > 0 && !kept[start - 1] {
                    start -= 1;
                }
                items.drain(start..end);
                changes.push(StructuralChange::Removed {
                    index: start,
                    count: end - start,
                });
                end = start;
            }
            kept.iter().filter(|kept| !**kept).count()
        })
    }

    /// Sort the items with `compare`, reported as a reset.
    ///
    /// The sort is stable. Nothing is reported when the order did not change.
    /// `compare` runs with the collection locked and must not call back
    /// into it.
    pub fn sort_by<F>(&self, mut compare: F)
    where
        F: FnMut(&ItemHandle, &ItemHandle) -> Ordering,
    {
        self.commit(|items, changes| {
            if items.len() < 2 {
                return;
            }
            let _span = PerfSpan::new(span_names::BULK, items.len());
            let before = items.clone();
            items.sort_by(|a, b| compare(a, b));
            if items.iter().zip(&before).any(|(a, b)| !a.ptr_eq(b)) {
                changes.push(StructuralChange::Reset);
            }
        });
    }

    // -------------------------------------------------------------------------
    // Notification control
    // -------------------------------------------------------------------------

    /// Enable or disable automatic change notification.
    ///
    /// While disabled, mutations still apply but emit nothing; the caller is
    /// responsible for reporting what changed through [`notify`](Self::notify).
    pub fn set_notifications_enabled(&self, enabled: bool) {
        self.notifications.store(enabled, AtomicOrdering::Release);
        tracing::debug!(target: targets::COLLECTION, enabled, "automatic notifications toggled");
    }

    /// Whether mutations notify automatically.
    pub fn notifications_enabled(&self) -> bool {
        self.notifications.load(AtomicOrdering::Acquire)
    }

    /// Emit `change` as if a mutation had just applied it.
    pub fn notify(&self, change: StructuralChange) {
        {
            let _items = self.items.read();
            self.outbox.lock().pending.push_back(change);
        }
        self.deliver();
    }

    fn append(&self, new: Vec<ItemHandle>) {
        self.commit(|items, changes| {
            if !new.is_empty() {
                changes.push(StructuralChange::Inserted {
                    index: items.len(),
                    count: new.len(),
                });
                items.extend(new);
            }
        });
    }

    /// Run `mutate` under the write lock, queue the changes it records, then
    /// deliver everything queued.
    fn commit<F, R>(&self, mutate: F) -> R
    where
        F: FnOnce(&mut Vec<ItemHandle>, &mut Vec<StructuralChange>) -> R,
    {
        let mut changes = Vec::new();
        let result = {
            let mut items = self.items.write();
            let result = mutate(&mut items, &mut changes);
            for change in &changes {
                tracing::trace!(target: targets::COLLECTION, %change, "applied change");
            }
            if !changes.is_empty() && self.notifications_enabled() {
                self.outbox.lock().pending.extend(changes);
            }
            result
        };
        self.deliver();
        result
    }

    /// Emit queued changes in order, unless an outer call is already doing so.
    fn deliver(&self) {
        {
            let mut outbox = self.outbox.lock();
            if outbox.delivering || outbox.pending.is_empty() {
                return;
            }
            outbox.delivering = true;
        }
        let mut guard = DeliveryGuard {
            outbox: &self.outbox,
            finished: false,
        };

        loop {
            let next = {
                let mut outbox = self.outbox.lock();
                let next = outbox.pending.pop_front();
                if next.is_none() {
                    outbox.delivering = false;
                }
                next
            };
            let Some(change) = next else {
                break;
            };
            self.signals.changed.emit(change);
        }
        guard.finished = true;
    }
}

/// Clears the delivering flag if a slot panics mid-delivery.
struct DeliveryGuard<'a> {
    outbox: &'a Mutex<Outbox>,
    finished: bool,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.outbox.lock().delivering = false;
        }
    }
}

fn check_insert_at(index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(AdapterError::out_of_range(index, len));
    }
    Ok(())
}

impl fmt::Debug for ItemCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemCollection")
            .field("items", &*self.items.read())
            .field("notifications", &self.notifications_enabled())
            .finish()
    }
}
