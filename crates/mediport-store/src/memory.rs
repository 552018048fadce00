//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{Storage, StorageError};

/// A [`Storage`] backend that keeps everything in a `HashMap`.
///
/// Nothing survives the process. This is the default backend: tests use
/// it for determinism, and hosts that already persist state elsewhere
/// use it to opt out of Mediport's own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items =
            self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items =
            self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items =
            self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_item_absent_key_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("token").unwrap(), None);
    }

    #[test]
    fn test_set_item_then_get_item_round_trips() {
        let store = MemoryStore::new();
        store.set_item("token", "T1").unwrap();
        assert_eq!(store.get_item("token").unwrap().as_deref(), Some("T1"));
    }

    #[test]
    fn test_set_item_overwrites_previous_value() {
        let store = MemoryStore::new();
        store.set_item("token", "old").unwrap();
        store.set_item("token", "new").unwrap();
        assert_eq!(store.get_item("token").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_remove_item_deletes_key() {
        let store = MemoryStore::new();
        store.set_item("user", "{}").unwrap();
        store.remove_item("user").unwrap();
        assert_eq!(store.get_item("user").unwrap(), None);
    }

    #[test]
    fn test_remove_item_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove_item("never-set").is_ok());
    }
}
