/*!
In-process record storage.
*/
use std::collections::HashMap;
use std::sync::RwLock;

use super::{check_key, RecordStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize {
        match self.records.read() {
            Ok(records) => records.len(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::from("memory store lock poisoned".to_owned())
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        log::trace!("MemoryStore::write( {:?}, [ {} bytes ] ) called.", key, value.len());
        check_key(key)?;
        let mut records = self.records.write().map_err(poisoned)?;
        records.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        log::trace!("MemoryStore::remove( {:?} ) called.", key);
        check_key(key)?;
        let mut records = self.records.write().map_err(poisoned)?;
        records.remove(key);
        Ok(())
    }
}
