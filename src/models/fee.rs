//! One-off money records outside the monthly ledger
//!
//! Extraordinary and degree fees are money a member pays in; each one can
//! carry a receipt number from its own receipt series. Expenses are money
//! the lodge pays out and are not tied to a member.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::dues::ReceiptRef;
use super::ids::{ExpenseId, FeeRecordId, MemberId};
use super::money::Money;
use super::receipt::ReceiptModule;

/// Kind of one-off fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    Extraordinary,
    Degree,
}

impl FeeKind {
    /// Receipt series a fee of this kind is numbered in
    pub fn receipt_module(&self) -> ReceiptModule {
        match self {
            Self::Extraordinary => ReceiptModule::Extraordinary,
            Self::Degree => ReceiptModule::Degree,
        }
    }

    /// Tag used on receipt lines and in exports
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Extraordinary => "extraordinary_fee",
            Self::Degree => "degree_fee",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "extraordinary" | "extra" | "ext" => Some(Self::Extraordinary),
            "degree" | "degrees" | "deg" => Some(Self::Degree),
            _ => None,
        }
    }
}

impl fmt::Display for FeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraordinary => write!(f, "extraordinary"),
            Self::Degree => write!(f, "degree"),
        }
    }
}

/// A fee paid by a member outside the monthly dues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeRecord {
    pub id: FeeRecordId,
    pub member_id: MemberId,
    pub kind: FeeKind,
    pub amount: Money,
    pub date: NaiveDate,

    #[serde(default)]
    pub note: Option<String>,

    /// Uploaded proof of payment
    #[serde(default)]
    pub attachment: Option<ReceiptRef>,

    /// "EXT-000003", set when a receipt was issued
    #[serde(default)]
    pub receipt_number: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl FeeRecord {
    pub fn new(member_id: MemberId, kind: FeeKind, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: FeeRecordId::new(),
            member_id,
            kind,
            amount,
            date,
            note: None,
            attachment: None,
            receipt_number: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_attachment(mut self, attachment: Option<ReceiptRef>) -> Self {
        self.attachment = attachment;
        self
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if !self.amount.is_positive() {
            return Err(RecordValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

/// Money paid out by the lodge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,

    /// Free-form grouping ("rent", "banquet", ...)
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub note: Option<String>,

    /// Invoice or voucher reference
    #[serde(default)]
    pub attachment: Option<ReceiptRef>,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(description: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: ExpenseId::new(),
            description: description.into(),
            amount,
            date,
            category: None,
            note: None,
            attachment: None,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.description.trim().is_empty() {
            return Err(RecordValidationError::EmptyDescription);
        }
        if !self.amount.is_positive() {
            return Err(RecordValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

/// Validation errors for fees and expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    NonPositiveAmount(Money),
    EmptyDescription,
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero, got {}", amount)
            }
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
        }
    }
}

impl std::error::Error for RecordValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 4).unwrap()
    }

    #[test]
    fn test_fee_kind_maps_to_receipt_series() {
        assert_eq!(FeeKind::Extraordinary.receipt_module(), ReceiptModule::Extraordinary);
        assert_eq!(FeeKind::Degree.receipt_module(), ReceiptModule::Degree);
        assert_eq!(FeeKind::parse("Degree"), Some(FeeKind::Degree));
        assert_eq!(FeeKind::parse("ext"), Some(FeeKind::Extraordinary));
        assert_eq!(FeeKind::parse("dues"), None);
    }

    #[test]
    fn test_fee_validation() {
        let fee = FeeRecord::new(MemberId::new(), FeeKind::Degree, Money::from_units(300), date());
        assert!(fee.validate().is_ok());

        let zero = FeeRecord::new(MemberId::new(), FeeKind::Degree, Money::zero(), date());
        assert_eq!(
            zero.validate(),
            Err(RecordValidationError::NonPositiveAmount(Money::zero()))
        );
    }

    #[test]
    fn test_expense_validation() {
        assert!(Expense::new("Hall rent", Money::from_units(400), date())
            .validate()
            .is_ok());
        assert_eq!(
            Expense::new("  ", Money::from_units(400), date()).validate(),
            Err(RecordValidationError::EmptyDescription)
        );
    }

    #[test]
    fn test_blank_note_is_dropped() {
        let fee = FeeRecord::new(MemberId::new(), FeeKind::Degree, Money::from_units(1), date())
            .with_note(Some("   ".into()));
        assert_eq!(fee.note, None);
    }

    #[test]
    fn test_fee_serialization_uses_snake_case_kind() {
        let fee = FeeRecord::new(
            MemberId::new(),
            FeeKind::Extraordinary,
            Money::from_units(25),
            date(),
        );
        let json = serde_json::to_string(&fee).unwrap();
        assert!(json.contains("\"kind\":\"extraordinary\""));
        let back: FeeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, FeeKind::Extraordinary);
    }
}
