//! FlexAdapter - a heterogeneous list/grid adapter.
//!
//! This is the main crate. It re-exports the core building blocks from
//! `flexadapter-core` and adds the item model and the adapter facade.
//!
//! # Example
//!
//! ```
//! use flexadapter::prelude::*;
//!
//! struct Unit;
//! impl RenderUnit for Unit {}
//!
//! struct Header(&'static str);
//!
//! impl FlexItem for Header {
//!     type Unit = Unit;
//!     fn create_unit(_: &dyn HostContainer) -> Unit {
//!         Unit
//!     }
//!     fn bind_unit(&self, _: &mut Unit, _: usize) {}
//!     fn span(&self) -> usize {
//!         3
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let adapter = FlexAdapter::with_columns(3)?;
//!     adapter.items().push(ItemHandle::new(Header("Pictures")));
//!     assert_eq!(adapter.span_lookup().span_size(0)?, 3);
//!     Ok(())
//! }
//! ```

pub use flexadapter_core::*;

pub mod adapter;
pub mod config;
pub mod host;
pub mod model;
pub mod prelude;

pub use adapter::{DragListener, FlexAdapter, RealizedUnit, SwipeListener};
pub use config::AdapterConfig;
pub use host::{HostWidget, RecordingHost};
