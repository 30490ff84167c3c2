//! Headless walk-through of a three-column picture grid.
//!
//! Builds the adapter a photo screen would use, then plays a few gestures
//! against it the way a host widget would report them, printing every
//! structural change the host receives.
//!
//! Run with:
//! ```sh
//! RUST_LOG=flexadapter=debug cargo run -p flexadapter --example sample
//! ```

use std::sync::Arc;

use flexadapter::prelude::*;
use tracing_subscriber::EnvFilter;

const COLUMNS: usize = 3;

// ============================================================================
// Rendering units
// ============================================================================

#[derive(Default)]
struct TextView {
    text: String,
}

impl RenderUnit for TextView {}

#[derive(Default)]
struct ImageView {
    image: String,
}

impl RenderUnit for ImageView {}

struct DividerView;

impl RenderUnit for DividerView {}

// ============================================================================
// Item kinds
// ============================================================================

struct HeaderItem {
    text: Property<&'static str>,
}

impl FlexItem for HeaderItem {
    type Unit = TextView;

    fn create_unit(_: &dyn HostContainer) -> TextView {
        TextView::default()
    }

    fn bind_unit(&self, unit: &mut TextView, _: usize) {
        unit.text = format!("== {} ==", self.text.get());
    }

    fn span(&self) -> usize {
        COLUMNS
    }
}

struct SquarePictureItem(&'static str);

impl FlexItem for SquarePictureItem {
    type Unit = ImageView;

    fn create_unit(_: &dyn HostContainer) -> ImageView {
        ImageView::default()
    }

    fn bind_unit(&self, unit: &mut ImageView, _: usize) {
        unit.image = self.0.to_string();
    }

    fn drag_directions(&self) -> Directions {
        Directions::ALL
    }
}

struct WidePictureItem {
    image: &'static str,
    span: usize,
    drag: Directions,
    swipe: Directions,
}

impl WidePictureItem {
    fn new(image: &'static str) -> Self {
        Self {
            image,
            span: COLUMNS,
            drag: Directions::NONE,
            swipe: Directions::NONE,
        }
    }
}

impl FlexItem for WidePictureItem {
    type Unit = ImageView;

    fn create_unit(_: &dyn HostContainer) -> ImageView {
        ImageView::default()
    }

    fn bind_unit(&self, unit: &mut ImageView, _: usize) {
        unit.image = self.image.to_string();
    }

    fn span(&self) -> usize {
        self.span
    }

    fn drag_directions(&self) -> Directions {
        self.drag
    }

    fn swipe_directions(&self) -> Directions {
        self.swipe
    }
}

struct TextItem {
    text: &'static str,
    drag: Directions,
}

impl FlexItem for TextItem {
    type Unit = TextView;

    fn create_unit(_: &dyn HostContainer) -> TextView {
        TextView::default()
    }

    fn bind_unit(&self, unit: &mut TextView, position: usize) {
        unit.text = format!("{position}: {}", self.text);
    }

    fn span(&self) -> usize {
        COLUMNS
    }

    fn drag_directions(&self) -> Directions {
        self.drag
    }
}

struct Divider;

impl FlexItem for Divider {
    type Unit = DividerView;

    fn create_unit(_: &dyn HostContainer) -> DividerView {
        DividerView
    }

    fn bind_unit(&self, _: &mut DividerView, _: usize) {}

    fn span(&self) -> usize {
        COLUMNS
    }
}

// ============================================================================
// Host
// ============================================================================

struct ConsoleHost;

impl HostWidget for ConsoleHost {
    fn on_structural_change(&self, change: &StructuralChange) {
        println!("  host <- {change}");
    }
}

/// Realize and bind every position, the way a host fills its viewport.
fn render(adapter: &FlexAdapter) -> Result<()> {
    let lookup = adapter.span_lookup();
    for index in 0..adapter.items().len() {
        let kind = adapter.item_kind(index)?;
        let mut unit = adapter.create_unit(kind, &DetachedContainer)?;
        adapter.bind_unit(&mut unit, index)?;

        let shown = if let Some(view) = unit.downcast_ref::<TextView>() {
            view.text.clone()
        } else if let Some(view) = unit.downcast_ref::<ImageView>() {
            format!("[{}]", view.image)
        } else {
            "-".repeat(12)
        };
        println!("{index:>3} span {} {shown}", lookup.span_size(index)?);
    }
    Ok(())
}

fn position(adapter: &FlexAdapter, item: &ItemHandle) -> Result<usize> {
    let items = adapter.items();
    items
        .index_of(item)
        .ok_or_else(|| AdapterError::out_of_range(items.len(), items.len()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let adapter = FlexAdapter::new(AdapterConfig::new().columns(COLUMNS))?;
    adapter.attach_host(Arc::new(ConsoleHost));

    let header1 = ItemHandle::new(HeaderItem {
        text: Property::new("Drag anything"),
    });
    let header2 = Arc::new(HeaderItem {
        text: Property::new("Swipe the car away"),
    });
    let vertical = |text| {
        ItemHandle::new(TextItem {
            text,
            drag: Directions::VERTICAL,
        })
    };

    let pinned = ItemHandle::new(TextItem {
        text: "Can't move",
        drag: Directions::NONE,
    });
    let first = vertical("First");
    let car = ItemHandle::new(WidePictureItem {
        swipe: Directions::HORIZONTAL,
        ..WidePictureItem::new("car")
    });

    let mut items = vec![header1.clone()];
    items.extend(SQUARES[..9].iter().copied().map(|image| ItemHandle::new(SquarePictureItem(image))));
    items.extend([
        ItemHandle::new(WidePictureItem {
            span: 2,
            drag: Directions::ALL,
            ..WidePictureItem::new("wide 3")
        }),
        ItemHandle::new(SquarePictureItem(SQUARES[9])),
        ItemHandle::new(Divider),
        ItemHandle::new(HeaderItem {
            text: Property::new("Drag vertically"),
        }),
        pinned.clone(),
        first.clone(),
        vertical("Second"),
        vertical("Third"),
        vertical("Fourth"),
        vertical("Fifth"),
        ItemHandle::new(Divider),
        ItemHandle::from_arc(header2.clone()),
        car.clone(),
        ItemHandle::new(HeaderItem {
            text: Property::new("This one stays"),
        }),
        ItemHandle::new(WidePictureItem::new("wide 2")),
    ]);

    println!("populating");
    adapter.items().extend(items);
    render(&adapter)?;

    adapter.set_swipe_listener(move |adapter, event| {
        println!("  swiped {:?} {}", event.item, event.direction);
        let _ = header2.text.set("Car swiped away");
        let header = ItemHandle::from_arc(header2.clone());
        adapter.mark_item_changed(&header);
    });
    adapter.set_drag_listener(|_, event| {
        println!("  dropped {:?}: {} -> {}", event.item, event.from, event.to);
    });

    println!("dragging the first vertical row down twice");
    let start = position(&adapter, &first)?;
    adapter.drag_start(start)?;
    adapter.drag_over(start + 1)?;
    adapter.drag_over(start + 2)?;
    adapter.drag_end();

    println!("trying to drag the pinned row");
    println!("  start: {:?}", adapter.drag_start(position(&adapter, &pinned)?)?);

    println!("swiping the car left");
    adapter.swipe(position(&adapter, &car)?, Direction::Left)?;

    println!("swiping the last picture, which does not allow it");
    let last = adapter.items().len() - 1;
    println!("  outcome: {:?}", adapter.swipe(last, Direction::Right)?);

    println!("adding an extra picture under the first header, then undoing");
    let extra = ItemHandle::new(SquarePictureItem("burt 11"));
    let at = adapter.items().index_of(&header1).map_or(0, |i| i + 1);
    adapter.items().insert(at, extra.clone())?;
    adapter.items().remove_item(&extra);

    println!("final layout");
    render(&adapter)?;
    Ok(())
}

const SQUARES: [&str; 10] = [
    "burt 1", "burt 2", "burt 3", "burt 4", "burt 5", "burt 6", "burt 7", "burt 8", "burt 9",
    "burt 10",
];
