use std::collections::HashMap;
use std::sync::Mutex;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::FallbackStore;
use crate::storage::types::StoreKey;

/// Process-local store; contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FallbackStore for MemoryStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(&key).cloned())
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(&key);
        Ok(())
    }
}
