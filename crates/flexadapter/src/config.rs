//! Adapter configuration.

use serde::Deserialize;

use flexadapter_core::{AdapterError, Result};

/// Configuration for a [`FlexAdapter`](crate::FlexAdapter).
///
/// Can be built in code or loaded from TOML:
///
/// ```
/// use flexadapter::AdapterConfig;
///
/// let config = AdapterConfig::from_toml_str("columns = 3\nrollback_drag_on_cancel = true").unwrap();
/// assert_eq!(config.columns, 3);
/// assert!(config.drag_listener_on_drop_only);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Number of grid columns. `1` is a plain list.
    pub columns: usize,
    /// Report a drag to the drag listener once, on drop, instead of after
    /// every intermediate move.
    pub drag_listener_on_drop_only: bool,
    /// Move the dragged item back to its origin when the host cancels a drag.
    pub rollback_drag_on_cancel: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            columns: 1,
            drag_listener_on_drop_only: true,
            rollback_drag_on_cancel: false,
        }
    }
}

impl AdapterConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of grid columns.
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Choose between drop-only and live drag listener reports.
    pub fn drag_listener_on_drop_only(mut self, enabled: bool) -> Self {
        self.drag_listener_on_drop_only = enabled;
        self
    }

    /// Enable or disable rollback of cancelled drags.
    pub fn rollback_drag_on_cancel(mut self, enabled: bool) -> Self {
        self.rollback_drag_on_cancel = enabled;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| AdapterError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for invalid values.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(AdapterError::config("columns must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::default();
        assert_eq!(config.columns, 1);
        assert!(config.drag_listener_on_drop_only);
        assert!(!config.rollback_drag_on_cancel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = AdapterConfig::new()
            .columns(4)
            .drag_listener_on_drop_only(false)
            .rollback_drag_on_cancel(true);
        assert_eq!(config.columns, 4);
        assert!(!config.drag_listener_on_drop_only);
        assert!(config.rollback_drag_on_cancel);
    }

    #[test]
    fn test_from_toml() {
        let config = AdapterConfig::from_toml_str("columns = 2").unwrap();
        assert_eq!(config, AdapterConfig::new().columns(2));

        let empty = AdapterConfig::from_toml_str("").unwrap();
        assert_eq!(empty, AdapterConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert_eq!(
            AdapterConfig::from_toml_str("columns = 0"),
            Err(AdapterError::config("columns must be at least 1"))
        );
        assert!(matches!(
            AdapterConfig::from_toml_str("columns = \"three\""),
            Err(AdapterError::Config(_))
        ));
        assert!(matches!(
            AdapterConfig::from_toml_str("rows = 3"),
            Err(AdapterError::Config(_))
        ));
    }
}
