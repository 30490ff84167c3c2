//! Error types for FlexAdapter.

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors reported to the immediate caller of an adapter operation.
///
/// A gesture that an item's direction policy forbids is not an error; the
/// gesture methods report it as a rejected outcome instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// An index outside the valid range of the collection.
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The host asked for a kind the registry never assigned.
    #[error("unknown item kind {0}")]
    UnknownKind(u32),

    /// A rendering unit was bound to an item of a different kind.
    #[error("rendering unit of kind {unit_kind} cannot bind item of kind {item_kind} ({item_type})")]
    UnitMismatch {
        unit_kind: u32,
        item_kind: u32,
        item_type: &'static str,
    },

    /// A value of a type that was never registered with the adapter.
    #[error("type {0} is not registered with the adapter")]
    Unregistered(&'static str),

    /// Invalid adapter configuration.
    #[error("invalid adapter configuration: {0}")]
    Config(String),
}

impl AdapterError {
    /// Create an out-of-range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check that `index` addresses an element of a sequence of length `len`.
    pub fn check_index(index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::out_of_range(index, len))
        }
    }
}
