//! In-memory key/value storage

use crate::traits::{KeyValueStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-local key/value store
///
/// Clones share the same underlying map, so a test can hand one clone to a
/// store and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let state = self.state.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(state.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut state = self.state.write().map_err(|_| StorageError::LockPoisoned)?;
        state.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut state = self.state.write().map_err(|_| StorageError::LockPoisoned)?;
        state.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set() {
        let store = MemoryStore::new();
        store.set("key1", "value").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("value"));

        store.set("key1", "replaced").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("replaced"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        store.set("key1", "value").unwrap();
        store.remove("key1").unwrap();
        store.remove("key1").unwrap();
        assert!(store.get("key1").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let view = store.clone();
        store.set("favorites", "[]").unwrap();
        assert_eq!(view.get("favorites").unwrap().as_deref(), Some("[]"));
        assert_eq!(view.len(), 1);
    }
}
