//! Editor configuration.

use crate::storage::STORAGE_KEY;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for the interaction engine.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Initial grid unit in logical pixels.
    pub unit: f64,
    /// Minimum time between accepted pointer moves.
    pub move_throttle_ms: u64,
    /// Quiet period before a requested zoom is applied.
    pub zoom_settle_ms: u64,
    /// Maximum edge/center distance that still produces a guide.
    pub guide_threshold: f64,
    pub initial_zoom: f64,
    /// Smallest width/height a shape may have.
    pub min_size: f64,
    /// Key of the persisted shape record.
    pub storage_key: String,
    /// Logical size of the drawing surface, centered in the viewport when
    /// it is first mounted. `None` leaves the logical origin at the
    /// top-left corner.
    pub content_size: Option<Size>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            unit: crate::store::DEFAULT_UNIT,
            move_throttle_ms: 16,
            zoom_settle_ms: 40,
            guide_threshold: crate::guides::GUIDE_THRESHOLD,
            initial_zoom: crate::viewport::DEFAULT_ZOOM,
            min_size: crate::store::MIN_SHAPE_SIZE,
            storage_key: STORAGE_KEY.to_string(),
            content_size: None,
        }
    }
}

impl EditorConfig {
    pub fn move_throttle(&self) -> Duration {
        Duration::from_millis(self.move_throttle_ms)
    }

    pub fn zoom_settle(&self) -> Duration {
        Duration::from_millis(self.zoom_settle_ms)
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.unit - 14.0).abs() < f64::EPSILON);
        assert_eq!(config.move_throttle(), Duration::from_millis(16));
        assert_eq!(config.zoom_settle(), Duration::from_millis(40));
        assert!((config.guide_threshold - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.storage_key, "shapes-storage");
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_json(r#"{"unit": 20, "zoomSettleMs": 100}"#).unwrap();
        assert!((config.unit - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.zoom_settle_ms, 100);
        assert_eq!(config.move_throttle_ms, 16);
        assert!(config.content_size.is_none());
    }

    #[test]
    fn test_content_size() {
        let config =
            EditorConfig::from_json(r#"{"contentSize": {"width": 4000, "height": 3000}}"#).unwrap();
        assert_eq!(config.content_size, Some(Size::new(4000.0, 3000.0)));
    }

    #[test]
    fn test_parse_error() {
        let result = EditorConfig::from_json("{ unit: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EditorConfig::from_file(Path::new("/nonexistent/snapcanvas.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
