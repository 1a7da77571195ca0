//! Browser `localStorage` implementation for WebAssembly.

use super::{PersistedState, Storage, StorageError, StorageResult};

/// Storage backed by the browser's `localStorage`.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's local storage.
    pub fn new() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))?;
        Ok(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn save(&self, key: &str, state: &PersistedState) -> StorageResult<()> {
        let json = serde_json::to_string(state)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.inner
            .set_item(key, &json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {:?}", key, e)))
    }

    fn load(&self, key: &str) -> StorageResult<PersistedState> {
        let json = self
            .inner
            .get_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        PersistedState::from_json(&json).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to delete {}: {:?}", key, e)))
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner
            .get_item(key)
            .map(|item| item.is_some())
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))
    }
}
