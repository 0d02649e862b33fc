//! Receipt numbering keys and the receipt data contract
//!
//! `PaymentReceipt` is what the external receipt composer (PDF, messaging)
//! consumes. It is built from the entries a payment actually wrote.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::dues::{DuesEntry, ReceiptRef};
use super::fiscal::DuesMonth;
use super::money::Money;

/// Independent receipt number sequences kept by the treasury
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptModule {
    /// Monthly dues
    Treasury,
    /// Extraordinary fees
    Extraordinary,
    /// Degree fees
    Degree,
}

impl ReceiptModule {
    pub fn all() -> &'static [ReceiptModule] {
        &[Self::Treasury, Self::Extraordinary, Self::Degree]
    }

    /// Prefix of the printed receipt number
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Treasury => "TRE",
            Self::Extraordinary => "EXT",
            Self::Degree => "DEG",
        }
    }

    /// Format a sequence value as a receipt number ("TRE-000042")
    pub fn format_number(&self, sequence: u64) -> String {
        format!("{}-{:06}", self.prefix(), sequence)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "treasury" | "dues" => Some(Self::Treasury),
            "extraordinary" | "extra" => Some(Self::Extraordinary),
            "degree" | "degrees" => Some(Self::Degree),
            _ => None,
        }
    }
}

impl fmt::Display for ReceiptModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Treasury => write!(f, "treasury"),
            Self::Extraordinary => write!(f, "extraordinary"),
            Self::Degree => write!(f, "degree"),
        }
    }
}

/// One month covered by a receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub month: DuesMonth,
    /// Money received for this month by this payment
    pub amount: Money,
    /// Payment type tag ("regular", "quick_pay", ...)
    pub payment_type: String,
}

impl ReceiptLine {
    pub fn new(month: DuesMonth, amount: Money, payment_type: impl Into<String>) -> Self {
        Self {
            month,
            amount,
            payment_type: payment_type.into(),
        }
    }

    /// Line for a freshly written entry (its whole amount was received now)
    pub fn from_entry(entry: &DuesEntry) -> Self {
        Self::new(entry.dues_month(), entry.amount, entry.kind.tag())
    }
}

/// Everything a receipt composer needs for one payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub receipt_number: String,
    pub issued_on: NaiveDate,
    pub institution_name: String,
    pub treasurer_name: String,
    pub member_name: String,
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
    #[serde(default)]
    pub attachment: Option<ReceiptRef>,
}
