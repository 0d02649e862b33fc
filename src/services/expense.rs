//! Expense service

use chrono::NaiveDate;
use log::{info, warn};

use crate::audit::EntityType;
use crate::error::{LodgeError, LodgeResult};
use crate::models::{DuesMonth, Expense, FiscalYearWindow, Money, ReceiptRef};
use crate::storage::Storage;

pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// An expense to record
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub note: Option<String>,
    pub attachment: Option<ReceiptRef>,
}

/// A saved expense
#[derive(Debug)]
pub struct RecordedExpense {
    pub expense: Expense,
    pub audit_failure: Option<LodgeError>,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn record(&self, input: ExpenseInput) -> LodgeResult<RecordedExpense> {
        let mut expense = Expense::new(input.description.trim(), input.amount, input.date);
        expense.category = input
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        expense.note = input.note.filter(|n| !n.trim().is_empty());
        expense.attachment = input.attachment;
        expense
            .validate()
            .map_err(|e| LodgeError::Validation(e.to_string()))?;

        self.storage.expenses.insert(expense.clone())?;
        info!("Recorded expense {} of {}", expense.id, expense.amount);

        let audit_failure = self
            .storage
            .log_create(
                EntityType::Expense,
                expense.id.to_string(),
                Some(expense.description.clone()),
                &expense,
            )
            .err();
        if let Some(e) = &audit_failure {
            warn!("Expense {} saved but not audited: {}", expense.id, e);
        }

        Ok(RecordedExpense {
            expense,
            audit_failure,
        })
    }

    /// Expenses, oldest first, optionally limited to one fiscal year
    pub fn list(&self, window: Option<FiscalYearWindow>) -> LodgeResult<Vec<Expense>> {
        let mut expenses = self.storage.expenses.get_all()?;
        if let Some(window) = window {
            expenses.retain(|e| window.contains(DuesMonth::from_date(e.date)));
        }
        Ok(expenses)
    }
}
