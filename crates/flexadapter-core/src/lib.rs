//! Core building blocks for FlexAdapter.
//!
//! This crate holds the pieces of the adapter that do not depend on the item
//! model itself:
//!
//! - **Signals**: synchronous, re-entrant change notification ([`Signal`])
//! - **Properties**: interior-mutable item fields ([`Property`])
//! - **Errors**: the [`AdapterError`] taxonomy and [`Result`] alias
//! - **Logging**: `tracing` targets and span helpers
//!
//! # Example
//!
//! ```
//! use flexadapter_core::{Property, Signal};
//!
//! struct Caption {
//!     text: Property<String>,
//!     text_changed: Signal<String>,
//! }
//!
//! let caption = Caption {
//!     text: Property::new(String::new()),
//!     text_changed: Signal::new(),
//! };
//!
//! caption.text_changed.connect(|text| println!("caption is now {text}"));
//!
//! let next = "Swipe me".to_string();
//! if caption.text.set(next.clone()) {
//!     caption.text_changed.emit(next);
//! }
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use error::{AdapterError, Result};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
