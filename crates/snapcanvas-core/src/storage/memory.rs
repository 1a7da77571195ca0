//! In-memory storage implementation.

use super::{PersistedState, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Records are kept as serialized JSON so that loading goes through the
/// same parsing path as the durable backends.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw record text under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, json: &str) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        records.insert(key.to_string(), json.to_string());
        Ok(())
    }

    /// Raw record text stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.records.read().ok()?.get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, state: &PersistedState) -> StorageResult<()> {
        let json = state
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.insert_raw(key, &json)
    }

    fn load(&self, key: &str) -> StorageResult<PersistedState> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        let json = records
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        PersistedState::from_json(json).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        records.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(records.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Shape, ShapeId};
    use crate::style::ShapeStyle;
    use kurbo::Point;

    fn sample_state() -> PersistedState {
        PersistedState::new(vec![Shape::new(
            ShapeId::from_index(1),
            Point::new(7.0, 14.0),
            ShapeStyle::for_unit(14.0, 1),
        )])
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let state = sample_state();

        storage.save("test", &state).unwrap();
        let loaded = storage.load("test").unwrap();

        assert_eq!(loaded, state);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = storage.load("nonexistent");

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_record() {
        let storage = MemoryStorage::new();
        storage.insert_raw("test", "{ not json").unwrap();

        let result = storage.load("test");
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();

        assert!(!storage.exists("test").unwrap());
        storage.save("test", &sample_state()).unwrap();
        assert!(storage.exists("test").unwrap());

        storage.delete("test").unwrap();
        assert!(!storage.exists("test").unwrap());
    }
}
