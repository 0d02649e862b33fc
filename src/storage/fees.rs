//! Fee record repository for JSON storage
//!
//! Extraordinary and degree fees live in fees.json.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{LodgeError, LodgeResult};
use crate::models::{FeeRecord, FeeRecordId, MemberId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct FeeData {
    fees: Vec<FeeRecord>,
}

pub struct FeeRepository {
    path: PathBuf,
    data: RwLock<HashMap<FeeRecordId, FeeRecord>>,
}

fn lock_error(e: impl std::fmt::Display) -> LodgeError {
    LodgeError::StoreUnavailable(format!("Failed to acquire lock: {}", e))
}

fn by_date(records: &mut [FeeRecord]) {
    records.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
}

impl FeeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> LodgeResult<()> {
        let file_data: FeeData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for fee in file_data.fees {
            data.insert(fee.id, fee);
        }
        Ok(())
    }

    pub fn save(&self) -> LodgeResult<()> {
        let data = self.data.read().map_err(lock_error)?;
        let mut fees: Vec<_> = data.values().cloned().collect();
        by_date(&mut fees);
        write_json_atomic(&self.path, &FeeData { fees })
    }

    pub fn get(&self, id: FeeRecordId) -> LodgeResult<Option<FeeRecord>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All fees, oldest first
    pub fn get_all(&self) -> LodgeResult<Vec<FeeRecord>> {
        let data = self.data.read().map_err(lock_error)?;
        let mut fees: Vec<_> = data.values().cloned().collect();
        by_date(&mut fees);
        Ok(fees)
    }

    pub fn get_by_member(&self, member_id: MemberId) -> LodgeResult<Vec<FeeRecord>> {
        let mut fees = self.get_all()?;
        fees.retain(|f| f.member_id == member_id);
        Ok(fees)
    }

    /// Add a fee and persist it; memory is restored if the write fails
    pub fn insert(&self, fee: FeeRecord) -> LodgeResult<()> {
        let id = fee.id;
        {
            let mut data = self.data.write().map_err(lock_error)?;
            if data.contains_key(&id) {
                return Err(LodgeError::Validation(format!("Fee {} already exists", id)));
            }
            data.insert(id, fee);
        }

        if let Err(e) = self.save() {
            self.data.write().map_err(lock_error)?.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    pub fn count(&self) -> LodgeResult<usize> {
        Ok(self.data.read().map_err(lock_error)?.len())
    }
}
