//! Receipt number counters
//!
//! One monotonically increasing sequence per receipt module, persisted to
//! receipt_counters.json after every increment.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{LodgeError, LodgeResult};
use crate::models::ReceiptModule;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CounterData {
    #[serde(default)]
    counters: BTreeMap<ReceiptModule, u64>,
}

/// Repository for receipt number sequences
pub struct ReceiptCounterRepository {
    path: PathBuf,
    counters: Mutex<BTreeMap<ReceiptModule, u64>>,
}

impl ReceiptCounterRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            counters: Mutex::new(BTreeMap::new()),
        }
    }

    /// Load counters from disk
    pub fn load(&self) -> LodgeResult<()> {
        let file_data: CounterData = read_json(&self.path)?;
        let mut counters = self.counters.lock().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire counter lock: {}", e))
        })?;
        *counters = file_data.counters;
        Ok(())
    }

    /// Last issued value for a module (0 if none issued yet)
    pub fn current(&self, module: ReceiptModule) -> LodgeResult<u64> {
        let counters = self.counters.lock().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire counter lock: {}", e))
        })?;
        Ok(counters.get(&module).copied().unwrap_or(0))
    }

    /// Increment and persist the sequence for a module, returning the new value
    ///
    /// The value is only handed out once it is on disk.
    pub fn next(&self, module: ReceiptModule) -> LodgeResult<u64> {
        let mut counters = self.counters.lock().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire counter lock: {}", e))
        })?;

        let previous = counters.get(&module).copied().unwrap_or(0);
        let value = previous + 1;
        counters.insert(module, value);

        let file_data = CounterData {
            counters: counters.clone(),
        };
        if let Err(e) = write_json_atomic(&self.path, &file_data) {
            counters.insert(module, previous);
            return Err(e);
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sequences_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ReceiptCounterRepository::new(temp_dir.path().join("counters.json"));
        repo.load().unwrap();

        assert_eq!(repo.next(ReceiptModule::Treasury).unwrap(), 1);
        assert_eq!(repo.next(ReceiptModule::Treasury).unwrap(), 2);
        assert_eq!(repo.next(ReceiptModule::Degree).unwrap(), 1);
        assert_eq!(repo.current(ReceiptModule::Extraordinary).unwrap(), 0);
    }

    #[test]
    fn test_counters_survive_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counters.json");

        let repo = ReceiptCounterRepository::new(path.clone());
        repo.load().unwrap();
        repo.next(ReceiptModule::Treasury).unwrap();
        repo.next(ReceiptModule::Treasury).unwrap();

        let repo2 = ReceiptCounterRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.next(ReceiptModule::Treasury).unwrap(), 3);
    }
}
