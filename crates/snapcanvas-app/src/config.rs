//! Application configuration.

use serde::{Deserialize, Serialize};
use snapcanvas_core::config::{ConfigError, EditorConfig};
use snapcanvas_core::storage::{
    FileStorage, MemoryStorage, Storage, StorageError, create_default_storage,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while setting up a session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Configuration for the application shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub title: String,
    /// Canvas width in screen pixels.
    pub width: u32,
    /// Canvas height in screen pixels.
    pub height: u32,
    /// Persist shapes to disk. When false the session runs in memory.
    pub persist: bool,
    /// Directory for persisted shapes; the platform data directory if unset.
    pub storage_dir: Option<PathBuf>,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "SnapCanvas".to_string(),
            width: 1280,
            height: 800,
            persist: false,
            storage_dir: None,
            editor: EditorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json).map_err(ConfigError::Parse)?)
    }

    /// Open the storage backend this configuration asks for.
    pub fn open_storage(&self) -> Result<Arc<dyn Storage>, AppError> {
        if !self.persist {
            return Ok(Arc::new(MemoryStorage::new()));
        }
        let storage = match &self.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir.clone())?),
            None => create_default_storage()?,
        };
        log::info!("Persisting shapes under {}", storage.base_path().display());
        Ok(storage as Arc<dyn Storage>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.width, 1280);
        assert!(!config.persist);
        assert!((config.editor.initial_zoom - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nested_editor_overrides() {
        let config: AppConfig =
            serde_json::from_str(r#"{"width": 640, "editor": {"unit": 10}}"#).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 800);
        assert!((config.editor.unit - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.editor.move_throttle_ms, 16);
    }

    #[test]
    fn test_load_missing_file() {
        let result = AppConfig::load(Path::new("/nonexistent/snapcanvas-app.json"));
        assert!(matches!(result, Err(AppError::Config(ConfigError::Io { .. }))));
    }

    #[test]
    fn test_file_storage_in_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            persist: true,
            storage_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let storage = config.open_storage().unwrap();
        assert!(!storage.exists("shapes-storage").unwrap());
    }
}
