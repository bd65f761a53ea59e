//! InMemoryStorage - HashMap-backed storage for tests and ephemeral contexts.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::Storage;
use crate::error::{StorageOp, StoreError};

/// In-memory storage backed by a HashMap.
///
/// Storage key is `"TYPE:id"`. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    units: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(type_name: &str, id: &str) -> String {
        format!("{}:{}", type_name, id)
    }

    /// Total number of stored units across all types.
    pub fn len(&self) -> usize {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for InMemoryStorage {
    fn read(&self, type_name: &str, id: &str) -> Result<Vec<u8>, StoreError> {
        let units = self
            .units
            .read()
            .map_err(|_| StoreError::storage(StorageOp::Read, "lock poisoned"))?;

        units
            .get(&Self::make_key(type_name, id))
            .cloned()
            .ok_or_else(|| StoreError::not_found(type_name, id))
    }

    fn write(&self, type_name: &str, id: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut units = self
            .units
            .write()
            .map_err(|_| StoreError::storage(StorageOp::Write, "lock poisoned"))?;

        units.insert(Self::make_key(type_name, id), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, type_name: &str, id: &str) -> Result<bool, StoreError> {
        let mut units = self
            .units
            .write()
            .map_err(|_| StoreError::storage(StorageOp::Delete, "lock poisoned"))?;

        Ok(units.remove(&Self::make_key(type_name, id)).is_some())
    }

    fn contains(&self, type_name: &str, id: &str) -> Result<bool, StoreError> {
        let units = self
            .units
            .read()
            .map_err(|_| StoreError::storage(StorageOp::Read, "lock poisoned"))?;

        Ok(units.contains_key(&Self::make_key(type_name, id)))
    }

    fn list_ids(&self, type_name: &str) -> Result<Vec<String>, StoreError> {
        let units = self
            .units
            .read()
            .map_err(|_| StoreError::storage(StorageOp::List, "lock poisoned"))?;

        let prefix = format!("{}:", type_name);
        let mut ids: Vec<String> = units
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(str::to_string)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read() {
        let storage = InMemoryStorage::new();
        storage.write("User", "1", b"one").unwrap();
        assert_eq!(storage.read("User", "1").unwrap(), b"one");
        assert!(storage.contains("User", "1").unwrap());
    }

    #[test]
    fn read_missing_is_not_found() {
        let storage = InMemoryStorage::new();
        assert!(storage.read("User", "missing").unwrap_err().is_not_found());
    }

    #[test]
    fn remove_reports_existence() {
        let storage = InMemoryStorage::new();
        storage.write("User", "1", b"one").unwrap();
        assert!(storage.remove("User", "1").unwrap());
        assert!(!storage.remove("User", "1").unwrap());
        assert!(storage.is_empty());
    }

    #[test]
    fn list_ids_is_scoped_to_type() {
        let storage = InMemoryStorage::new();
        storage.write("User", "b", b"").unwrap();
        storage.write("User", "a", b"").unwrap();
        storage.write("Post", "c", b"").unwrap();

        assert_eq!(
            storage.list_ids("User").unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(storage.list_ids("Post").unwrap(), vec!["c".to_string()]);
        assert!(storage.list_ids("Ghost").unwrap().is_empty());
    }

    #[test]
    fn clone_shares_units() {
        let storage = InMemoryStorage::new();
        let clone = storage.clone();
        storage.write("User", "1", b"one").unwrap();
        assert_eq!(clone.read("User", "1").unwrap(), b"one");
        assert_eq!(clone.len(), 1);
    }

    #[test]
    fn len_survives_a_poisoned_lock() {
        let storage = InMemoryStorage::new();
        storage.write("User", "1", b"one").unwrap();

        let units = Arc::clone(&storage.units);
        let _ = std::thread::spawn(move || {
            let _guard = units.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(storage.units.is_poisoned());
        assert_eq!(storage.len(), 1);
        assert!(!storage.is_empty());
    }
}
