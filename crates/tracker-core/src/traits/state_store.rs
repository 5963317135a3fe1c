// # State Store Trait
//
// Defines the interface for persisting configuration maps between runs.
//
// ## Purpose
//
// The orchestrator owns the configuration map of every managed entity.
// A state store keeps one `ResourceData` per resource address
// (`<kind>.<name>`) so that read/update/delete can find the identifier
// recorded by create.
//
// ## Implementations
//
// - In-memory: `MemoryStateStore`
// - File-based: `FileStateStore` (JSON, atomic writes)

use crate::data::ResourceData;

/// State record for one managed resource
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateRecord {
    /// The configuration map, including the identifier
    pub data: ResourceData,
    /// Timestamp of the last write
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl StateRecord {
    /// Create a new state record stamped with the current time
    pub(crate) fn new(data: ResourceData) -> Self {
        Self {
            data,
            last_updated: chrono::Utc::now(),
        }
    }
}

/// Trait for state store implementations
///
/// All methods must be safe to call from multiple threads.
pub trait StateStore: Send + Sync {
    /// Get the stored record for an address
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StateRecord))`: The stored record
    /// - `Ok(None)`: Nothing stored under this address
    /// - `Err(Error)`: Storage error
    fn get_record(&self, address: &str) -> Result<Option<StateRecord>, crate::Error>;

    /// Store the configuration map for an address, replacing any previous one
    fn set_data(&self, address: &str, data: &ResourceData) -> Result<(), crate::Error>;

    /// Remove an address (no-op if absent)
    fn delete_record(&self, address: &str) -> Result<(), crate::Error>;

    /// List all stored addresses
    fn list_records(&self) -> Result<Vec<String>, crate::Error>;

    /// Persist any pending changes
    fn flush(&self) -> Result<(), crate::Error>;

    /// Convenience: the configuration map stored for an address
    fn get_data(&self, address: &str) -> Result<Option<ResourceData>, crate::Error> {
        Ok(self.get_record(address)?.map(|record| record.data))
    }
}
