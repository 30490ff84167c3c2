//! Synchronous signal/slot notifications.
//!
//! The adapter reports every structural change of its collection through a
//! [`Signal`]. Slots are plain closures invoked on the emitting thread, in
//! the order they were connected, before `emit` returns. A slot connected
//! after another one disconnected still runs after every older slot.
//!
//! # Re-entrancy
//!
//! The connection table is locked only long enough to snapshot the connected
//! slots. Slots are invoked with no lock held, so a slot may connect or
//! disconnect slots, or trigger another emission of the same signal.
//! Connections made during an emission take effect from the next emission.
//!
//! # Example
//!
//! ```
//! use flexadapter_core::Signal;
//!
//! let inserted = Signal::<(usize, usize)>::new();
//!
//! let id = inserted.connect(|(index, count)| {
//!     println!("{count} item(s) inserted at {index}");
//! });
//!
//! inserted.emit((0, 3));
//! inserted.disconnect(id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Identifier of a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`] to
    /// remove the slot again.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Connected slots plus the order they were connected in.
///
/// Slot map keys reuse freed slots, so iteration order of the map says
/// nothing about connection order.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

/// A type-safe signal with any number of connected slots.
///
/// `Args` is the value handed to every slot by reference. Use `()` for
/// signals without payload and tuples or enums for richer notifications.
pub struct Signal<Args> {
    connections: Mutex<Connections<Args>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections {
                slots: SlotMap::with_key(),
                order: Vec::new(),
            }),
        }
    }

    /// Connect a slot to this signal.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Arc::new(slot));
        connections.order.push(id);
        id
    }

    /// Disconnect a slot. Returns `false` if the id was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_none() {
            return false;
        }
        connections.order.retain(|connected| *connected != id);
        true
    }

    /// Invoke every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "flexadapter_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = {
            let connections = self.connections.lock();
            connections
                .order
                .iter()
                .filter_map(|id| connections.slots.get(*id).cloned())
                .collect()
        };
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}
