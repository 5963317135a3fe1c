// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Purpose
//
// Provides a simple, fast state store that doesn't persist across restarts.
// Useful for tests and for driving a single lifecycle sequence in-process.
//
// ## Crash Behavior
//
// - All state is lost on exit
// - Identifiers recorded by create are forgotten, so the entities they
//   point at are no longer managed

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::Error;
use crate::data::ResourceData;
use crate::traits::state_store::{StateRecord, StateStore};

/// In-memory state store implementation
///
/// This implementation stores all state in a HashMap protected by a RwLock.
/// It provides no persistence across restarts.
///
/// # Example
///
/// ```rust
/// use tracker_core::ResourceData;
/// use tracker_core::state::MemoryStateStore;
/// use tracker_core::traits::StateStore;
///
/// let store = MemoryStateStore::new();
///
/// let mut data = ResourceData::new();
/// data.set_id("1234");
/// store.set_data("pivotaltracker_project.main", &data).unwrap();
///
/// let stored = store.get_data("pivotaltracker_project.main").unwrap();
/// assert_eq!(stored, Some(data));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<HashMap<String, StateRecord>>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of records in the store
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all records from the store
    pub fn clear(&self) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl StateStore for MemoryStateStore {
    fn get_record(&self, address: &str) -> Result<Option<StateRecord>, Error> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(address).cloned())
    }

    fn set_data(&self, address: &str, data: &ResourceData) -> Result<(), Error> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(address.to_string(), StateRecord::new(data.clone()));
        Ok(())
    }

    fn delete_record(&self, address: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.remove(address);
        Ok(())
    }

    fn list_records(&self) -> Result<Vec<String>, Error> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut addresses: Vec<String> = guard.keys().cloned().collect();
        addresses.sort();
        Ok(addresses)
    }

    fn flush(&self) -> Result<(), Error> {
        // Nothing buffered
        Ok(())
    }
}
