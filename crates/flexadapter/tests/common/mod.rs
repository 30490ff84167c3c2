//! Item kinds shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use flexadapter::prelude::*;
use parking_lot::Mutex;

#[derive(Default)]
pub struct TextView {
    pub text: String,
}

impl RenderUnit for TextView {}

/// A full-width header whose text can change after it is added.
pub struct HeaderItem {
    pub text: Property<u32>,
}

impl HeaderItem {
    pub fn new(text: u32) -> Self {
        Self {
            text: Property::new(text),
        }
    }
}

impl FlexItem for HeaderItem {
    type Unit = TextView;

    fn create_unit(_: &dyn HostContainer) -> TextView {
        TextView::default()
    }

    fn bind_unit(&self, unit: &mut TextView, _: usize) {
        unit.text = self.text.get().to_string();
    }

    fn span(&self) -> usize {
        3
    }
}

/// A row with configurable gestures.
pub struct Row {
    pub id: u32,
    pub drag: Directions,
    pub swipe: Directions,
}

impl Row {
    pub fn draggable(id: u32, drag: Directions) -> ItemHandle {
        ItemHandle::new(Self {
            id,
            drag,
            swipe: Directions::NONE,
        })
    }

    pub fn swipeable(id: u32, swipe: Directions) -> ItemHandle {
        ItemHandle::new(Self {
            id,
            drag: Directions::NONE,
            swipe,
        })
    }
}

impl FlexItem for Row {
    type Unit = TextView;

    fn create_unit(_: &dyn HostContainer) -> TextView {
        TextView::default()
    }

    fn bind_unit(&self, unit: &mut TextView, position: usize) {
        unit.text = format!("row {} at {position}", self.id);
    }

    fn drag_directions(&self) -> Directions {
        self.drag
    }

    fn swipe_directions(&self) -> Directions {
        self.swipe
    }
}

pub struct ImageView;

impl RenderUnit for ImageView {}

/// A square picture that can be dragged anywhere.
pub struct SquarePicture(pub u32);

impl FlexItem for SquarePicture {
    type Unit = ImageView;

    fn create_unit(_: &dyn HostContainer) -> ImageView {
        ImageView
    }

    fn bind_unit(&self, _: &mut ImageView, _: usize) {}

    fn drag_directions(&self) -> Directions {
        Directions::ALL
    }
}

/// Row ids in collection order; non-row items show as `None`.
pub fn row_ids(items: &ItemCollection) -> Vec<Option<u32>> {
    items
        .snapshot()
        .iter()
        .map(|item| item.downcast_ref::<Row>().map(|row| row.id))
        .collect()
}

/// Records every change alongside a shadow copy rebuilt from them.
pub struct ShadowHost {
    adapter_items: std::sync::Weak<ItemCollection>,
    pub changes: Mutex<Vec<StructuralChange>>,
    pub shadow: Mutex<Vec<ItemHandle>>,
}

impl ShadowHost {
    pub fn attach(adapter: &FlexAdapter) -> Arc<Self> {
        let host = Arc::new(Self {
            adapter_items: Arc::downgrade(adapter.items()),
            changes: Mutex::new(Vec::new()),
            shadow: Mutex::new(adapter.items().snapshot()),
        });
        adapter.attach_host(host.clone());
        host
    }

    pub fn changes(&self) -> Vec<StructuralChange> {
        self.changes.lock().clone()
    }

    pub fn matches(&self, items: &ItemCollection) -> bool {
        let shadow = self.shadow.lock();
        let current = items.snapshot();
        shadow.len() == current.len() && shadow.iter().zip(&current).all(|(a, b)| a.ptr_eq(b))
    }
}

impl HostWidget for ShadowHost {
    fn on_structural_change(&self, change: &StructuralChange) {
        self.changes.lock().push(*change);
        if let Some(items) = self.adapter_items.upgrade() {
            change.replay(&mut *self.shadow.lock(), &items.snapshot());
        }
    }
}
