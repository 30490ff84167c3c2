//! Logging facilities for FlexAdapter.
//!
//! FlexAdapter is instrumented with the `tracing` crate. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("flexadapter=debug")
//!     .init();
//! ```
//!
//! Every event carries one of the [`targets`] below so a filter directive can
//! select a single subsystem, e.g. `RUST_LOG=flexadapter::gesture=trace`.

/// Span names used for tracing.
pub mod span_names {
    /// Bulk collection operations (reset, sort, retain).
    pub const BULK: &str = "flexadapter::bulk";
    /// Rendering unit creation and binding.
    pub const REALIZE: &str = "flexadapter::realize";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "flexadapter_core";
    /// Signal emission.
    pub const SIGNAL: &str = "flexadapter_core::signal";
    /// Item collection mutations.
    pub const COLLECTION: &str = "flexadapter::collection";
    /// Item kind registry.
    pub const REGISTRY: &str = "flexadapter::registry";
    /// Drag and swipe gesture handling.
    pub const GESTURE: &str = "flexadapter::gesture";
    /// Span resolution.
    pub const SPAN: &str = "flexadapter::span";
    /// Adapter facade.
    pub const ADAPTER: &str = "flexadapter::adapter";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used around operations whose cost grows with the collection size, so a
/// subscriber that records span timings can spot them.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a span named `name` recording `len` as the collection size.
    pub fn new(name: &'static str, len: usize) -> Self {
        let span = tracing::debug_span!(target: "flexadapter::perf", "perf", operation = name, len);
        Self {
            _span: span.entered(),
        }
    }
}
