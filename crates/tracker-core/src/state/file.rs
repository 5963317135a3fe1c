// # File State Store
//
// File-based implementation of StateStore with crash recovery.
//
// ## Purpose
//
// Keeps the configuration map of every managed resource across runs, so
// the identifier recorded by create is available to later read, update and
// delete calls.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps .backup of last known good state
// - Recovery: Falls back to backup if corruption detected
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "records": {
//     "pivotaltracker_project.main": {
//       "data": { "id": "1234", "values": { "name": "tracker" } },
//       "last_updated": "2025-01-09T12:00:00Z"
//     }
//   }
// }
// ```

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::Error;
use crate::data::ResourceData;
use crate::traits::state_store::{StateRecord, StateStore};

/// State file format version
/// Used for future migration if format changes
const STATE_FILE_VERSION: &str = "1.0";

/// File-based state store with crash recovery
///
/// Every mutation is written through to disk before returning.
///
/// # Example
///
/// ```rust,no_run
/// use tracker_core::ResourceData;
/// use tracker_core::state::FileStateStore;
/// use tracker_core::traits::StateStore;
///
/// let store = FileStateStore::new("tracker-state.json")?;
///
/// let mut data = ResourceData::new();
/// data.set_id("1234");
/// store.set_data("pivotaltracker_project.main", &data)?;
/// # Ok::<(), tracker_core::Error>(())
/// ```
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    state: RwLock<FileState>,
}

/// Internal state for file-based store
#[derive(Debug)]
struct FileState {
    records: HashMap<String, StateRecord>,
    dirty: bool,
}

/// Serializable state file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StateFileFormat {
    version: String,
    records: HashMap<String, StateRecord>,
}

/// Why a state file could not be loaded
enum LoadFailure {
    /// The file exists but is not a valid state file
    Corrupted(Error),
    /// The file could not be read at all
    Io(Error),
}

impl FileStateStore {
    /// Create or load a file state store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Try to load existing state file
    /// 3. If corruption detected, try to load from backup
    /// 4. If both fail, start with empty state
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                Error::config(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let records = Self::load_state_with_recovery(&path)?;

        Ok(Self {
            path,
            state: RwLock::new(FileState {
                records,
                dirty: false,
            }),
        })
    }

    /// Load state from file with automatic recovery
    fn load_state_with_recovery(path: &Path) -> Result<HashMap<String, StateRecord>, Error> {
        let corruption = match Self::load_state(path) {
            Ok(records) => {
                tracing::debug!("Loaded state from file: {} records", records.len());
                return Ok(records);
            }
            Err(LoadFailure::Io(e)) => return Err(e),
            Err(LoadFailure::Corrupted(e)) => e,
        };

        tracing::warn!(
            "State file appears corrupted: {}. Attempting recovery from backup.",
            corruption
        );

        let backup_path = Self::backup_path(path);
        if !backup_path.exists() {
            tracing::warn!("No backup file found. Starting with empty state.");
            return Ok(HashMap::new());
        }

        match Self::load_state(&backup_path) {
            Ok(records) => {
                tracing::info!("Recovered state from backup: {} records", records.len());

                if let Err(e) = fs::copy(&backup_path, path) {
                    tracing::error!("Failed to restore state file from backup: {}", e);
                }

                Ok(records)
            }
            Err(LoadFailure::Corrupted(e) | LoadFailure::Io(e)) => {
                tracing::error!("Backup also unusable: {}. Starting with empty state.", e);
                Ok(HashMap::new())
            }
        }
    }

    /// Load state from file
    fn load_state(path: &Path) -> Result<HashMap<String, StateRecord>, LoadFailure> {
        if !path.exists() {
            tracing::debug!("State file does not exist: {}", path.display());
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            LoadFailure::Io(Error::state_store(format!(
                "Failed to read state file {}: {}",
                path.display(),
                e
            )))
        })?;

        let state_file: StateFileFormat = serde_json::from_str(&content).map_err(|e| {
            LoadFailure::Corrupted(Error::state_store(format!(
                "Failed to parse state file {}: {}",
                path.display(),
                e
            )))
        })?;

        if state_file.version != STATE_FILE_VERSION {
            tracing::warn!(
                "State file version mismatch: expected {}, got {}. Attempting to load anyway.",
                STATE_FILE_VERSION,
                state_file.version
            );
        }

        Ok(state_file.records)
    }

    /// Write state to file atomically
    fn write_state(&self) -> Result<(), Error> {
        let mut state_guard = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let state_file = StateFileFormat {
            version: STATE_FILE_VERSION.to_string(),
            records: state_guard.records.clone(),
        };

        let json = serde_json::to_string_pretty(&state_file)
            .map_err(|e| Error::state_store(format!("Failed to serialize state: {}", e)))?;

        // Write to temporary file first
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).map_err(|e| {
                Error::state_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.sync_all().map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Keep the previous good state around
        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path) {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        state_guard.dirty = false;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    /// Get path to backup file
    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate(&self, f: impl FnOnce(&mut HashMap<String, StateRecord>)) -> Result<(), Error> {
        {
            let mut state_guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state_guard.records);
            state_guard.dirty = true;
        }

        // Immediate write for durability
        self.write_state()
    }
}

impl StateStore for FileStateStore {
    fn get_record(&self, address: &str) -> Result<Option<StateRecord>, Error> {
        let state_guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state_guard.records.get(address).cloned())
    }

    fn set_data(&self, address: &str, data: &ResourceData) -> Result<(), Error> {
        let record = StateRecord::new(data.clone());
        self.mutate(|records| {
            records.insert(address.to_string(), record);
        })
    }

    fn delete_record(&self, address: &str) -> Result<(), Error> {
        self.mutate(|records| {
            records.remove(address);
        })
    }

    fn list_records(&self) -> Result<Vec<String>, Error> {
        let state_guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let mut addresses: Vec<String> = state_guard.records.keys().cloned().collect();
        addresses.sort();
        Ok(addresses)
    }

    fn flush(&self) -> Result<(), Error> {
        let dirty = self.state.read().unwrap_or_else(PoisonError::into_inner).dirty;
        if dirty { self.write_state() } else { Ok(()) }
    }
}
