//! Expense repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{LodgeError, LodgeResult};
use crate::models::{Expense, ExpenseId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

fn lock_error(e: impl std::fmt::Display) -> LodgeError {
    LodgeError::StoreUnavailable(format!("Failed to acquire lock: {}", e))
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> LodgeResult<()> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for expense in file_data.expenses {
            data.insert(expense.id, expense);
        }
        Ok(())
    }

    pub fn save(&self) -> LodgeResult<()> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> LodgeResult<Option<Expense>> {
        Ok(self.data.read().map_err(lock_error)?.get(&id).cloned())
    }

    /// All expenses, oldest first
    pub fn get_all(&self) -> LodgeResult<Vec<Expense>> {
        let data = self.data.read().map_err(lock_error)?;
        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(expenses)
    }

    /// Add an expense and persist it; memory is restored if the write fails
    pub fn insert(&self, expense: Expense) -> LodgeResult<()> {
        let id = expense.id;
        {
            let mut data = self.data.write().map_err(lock_error)?;
            if data.contains_key(&id) {
                return Err(LodgeError::Validation(format!("Expense {} already exists", id)));
            }
            data.insert(id, expense);
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
