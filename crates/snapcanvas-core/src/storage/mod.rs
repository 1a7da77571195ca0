//! Storage abstraction for persistence.
//!
//! Only the shape list is persisted. It is stored as a single keyed record
//! of the form `{ "shapes": [...] }`.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::shape::Shape;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Key under which the shape list is persisted.
pub const STORAGE_KEY: &str = "shapes-storage";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// The persisted part of the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub shapes: Vec<Shape>,
}

impl PersistedState {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Serialize the record to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Trait for storage backends.
///
/// All operations are synchronous: the editor writes on every mutation
/// from inside its event handlers.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a record under `key`, replacing any previous one.
    fn save(&self, key: &str, state: &PersistedState) -> StorageResult<()>;

    /// Load the record stored under `key`.
    fn load(&self, key: &str) -> StorageResult<PersistedState>;

    /// Delete the record stored under `key`.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a record exists.
    fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Trait for storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save a record under `key`, replacing any previous one.
    fn save(&self, key: &str, state: &PersistedState) -> StorageResult<()>;

    /// Load the record stored under `key`.
    fn load(&self, key: &str) -> StorageResult<PersistedState>;

    /// Delete the record stored under `key`.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a record exists.
    fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Convenience type alias for platform-specific storage.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = FileStorage;

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = LocalStorage;

/// Create a platform-appropriate storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<PlatformStorage>> {
    Ok(Arc::new(FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<Arc<PlatformStorage>> {
    Ok(Arc::new(LocalStorage::new()?))
}
