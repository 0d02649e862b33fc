//! Dues entry model
//!
//! One `DuesEntry` holds the money applied to a single member for a single
//! calendar month. The payment kind is a tagged variant so that only bulk
//! entries carry a group id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::fiscal::DuesMonth;
use super::ids::{DuesEntryId, MemberId, PaymentGroupId};
use super::money::Money;

/// Composite key of a dues slot: one member, one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub member_id: MemberId,
    pub month: DuesMonth,
}

impl SlotKey {
    pub fn new(member_id: MemberId, month: DuesMonth) -> Self {
        Self { member_id, month }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.member_id, self.month)
    }
}

/// Opaque reference to an uploaded receipt image held by external file storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptRef(String);

impl ReceiptRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the money in an entry got there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentKind {
    /// Single payment, possibly distributed by the allocator
    Regular,
    /// One of the paid months of a quick-pay batch
    QuickPay { group_id: PaymentGroupId },
    /// The free month of a full-year quick-pay batch; always zero
    QuickPayBenefit { group_id: PaymentGroupId },
    /// One month of an advance-pay batch at the full fee
    AdvancePay { group_id: PaymentGroupId },
}

impl PaymentKind {
    pub fn group_id(&self) -> Option<PaymentGroupId> {
        match self {
            Self::Regular => None,
            Self::QuickPay { group_id }
            | Self::QuickPayBenefit { group_id }
            | Self::AdvancePay { group_id } => Some(*group_id),
        }
    }

    /// Tag as stored and exported ("regular", "quick_pay", ...)
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::QuickPay { .. } => "quick_pay",
            Self::QuickPayBenefit { .. } => "quick_pay_benefit",
            Self::AdvancePay { .. } => "advance_pay",
        }
    }

    pub fn is_benefit(&self) -> bool {
        matches!(self, Self::QuickPayBenefit { .. })
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "Regular"),
            Self::QuickPay { .. } => write!(f, "Quick-pay"),
            Self::QuickPayBenefit { .. } => write!(f, "Quick-pay benefit"),
            Self::AdvancePay { .. } => write!(f, "Advance-pay"),
        }
    }
}

/// Money applied to one member for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuesEntry {
    /// Unique identifier
    pub id: DuesEntryId,

    pub member_id: MemberId,

    /// Calendar month (1-12)
    pub month: u32,

    /// Calendar year
    pub year: i32,

    /// Amount applied; never negative
    pub amount: Money,

    /// Date the money was recorded
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,

    pub kind: PaymentKind,

    #[serde(default)]
    pub note: Option<String>,

    /// Uploaded receipt image, if any
    #[serde(default)]
    pub receipt: Option<ReceiptRef>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DuesEntry {
    /// Create a new entry for a slot
    pub fn new(member_id: MemberId, month: DuesMonth, amount: Money, kind: PaymentKind) -> Self {
        let now = Utc::now();
        Self {
            id: DuesEntryId::new(),
            member_id,
            month: month.month,
            year: month.year,
            amount,
            payment_date: None,
            kind,
            note: None,
            receipt: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a regular (single payment) entry
    pub fn regular(member_id: MemberId, month: DuesMonth, amount: Money) -> Self {
        Self::new(member_id, month, amount, PaymentKind::Regular)
    }

    pub fn dues_month(&self) -> DuesMonth {
        DuesMonth::new(self.year, self.month)
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.member_id, self.dues_month())
    }

    pub fn group_id(&self) -> Option<PaymentGroupId> {
        self.kind.group_id()
    }

    pub fn is_benefit(&self) -> bool {
        self.kind.is_benefit()
    }

    /// Amount that counts toward paid totals (benefit months count as zero)
    pub fn counted_amount(&self) -> Money {
        if self.is_benefit() {
            Money::zero()
        } else {
            self.amount
        }
    }

    pub fn with_payment_date(mut self, date: NaiveDate) -> Self {
        self.payment_date = Some(date);
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_receipt(mut self, receipt: Option<ReceiptRef>) -> Self {
        self.receipt = receipt;
        self
    }

    /// Apply a set of field changes, returning a summary of what changed
    pub fn apply_changes(
        &mut self,
        changes: &EntryChanges,
    ) -> Result<Vec<String>, DuesValidationError> {
        changes.validate_for(self)?;

        let mut summary = Vec::new();

        if let Some(amount) = changes.amount {
            if amount != self.amount {
                summary.push(format!("amount: {} -> {}", self.amount, amount));
                self.amount = amount;
            }
        }

        if let Some(date) = changes.payment_date {
            if self.payment_date != Some(date) {
                summary.push(format!(
                    "payment_date: {} -> {}",
                    self.payment_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "none".into()),
                    date
                ));
                self.payment_date = Some(date);
            }
        }

        if let Some(note) = &changes.note {
            let note = note.clone().filter(|n| !n.trim().is_empty());
            if self.note != note {
                summary.push("note changed".to_string());
                self.note = note;
            }
        }

        if let Some(receipt) = &changes.receipt {
            if self.receipt.as_ref() != Some(receipt) {
                summary.push(format!("receipt: {}", receipt));
                self.receipt = Some(receipt.clone());
            }
        }

        if !summary.is_empty() {
            self.updated_at = Utc::now();
        }

        Ok(summary)
    }
}

impl fmt::Display for DuesEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.dues_month(), self.amount, self.kind.tag())
    }
}

/// Field updates for an existing entry; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryChanges {
    pub amount: Option<Money>,
    pub payment_date: Option<NaiveDate>,
    /// `Some(None)` clears the note
    pub note: Option<Option<String>>,
    pub receipt: Option<ReceiptRef>,
}

impl EntryChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn payment_date(mut self, date: NaiveDate) -> Self {
        self.payment_date = Some(date);
        self
    }

    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = Some(note);
        self
    }

    pub fn receipt(mut self, receipt: ReceiptRef) -> Self {
        self.receipt = Some(receipt);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check these changes against the entry they will be applied to
    pub fn validate_for(&self, entry: &DuesEntry) -> Result<(), DuesValidationError> {
        if let Some(amount) = self.amount {
            if amount.is_negative() {
                return Err(DuesValidationError::NegativeAmount(amount));
            }
            if entry.is_benefit() && !amount.is_zero() {
                return Err(DuesValidationError::BenefitAmount);
            }
        }
        Ok(())
    }
}

/// Validation errors for dues entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuesValidationError {
    NegativeAmount(Money),
    BenefitAmount,
}

impl fmt::Display for DuesValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(m) => write!(f, "Dues amount cannot be negative ({})", m),
            Self::BenefitAmount => {
                write!(f, "A quick-pay benefit month is always free; its amount stays 0")
            }
        }
    }
}

impl std::error::Error for DuesValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn august() -> DuesMonth {
        DuesMonth::new(2025, 8)
    }

    #[test]
    fn test_regular_entry() {
        let member = MemberId::new();
        let entry = DuesEntry::regular(member, august(), Money::from_units(50));

        assert_eq!(entry.dues_month(), august());
        assert_eq!(entry.slot_key(), SlotKey::new(member, august()));
        assert_eq!(entry.group_id(), None);
        assert_eq!(entry.kind.tag(), "regular");
    }

    #[test]
    fn test_benefit_counts_as_zero_and_settled() {
        let group_id = PaymentGroupId::new();
        let entry = DuesEntry::new(
            MemberId::new(),
            august(),
            Money::zero(),
            PaymentKind::QuickPayBenefit { group_id },
        );

        assert!(entry.is_benefit());
        assert_eq!(entry.counted_amount(), Money::zero());
        assert_eq!(entry.group_id(), Some(group_id));
    }

    #[test]
    fn test_apply_changes_summary() {
        let mut entry = DuesEntry::regular(MemberId::new(), august(), Money::from_units(30));
        let date = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();

        let summary = entry
            .apply_changes(
                &EntryChanges::new()
                    .amount(Money::from_units(50))
                    .payment_date(date)
                    .note(Some("corrected".into())),
            )
            .unwrap();

        assert_eq!(entry.amount, Money::from_units(50));
        assert_eq!(entry.payment_date, Some(date));
        assert_eq!(entry.note.as_deref(), Some("corrected"));
        assert_eq!(summary.len(), 3);
        assert!(summary[0].starts_with("amount: $30.00 -> $50.00"));
    }

    #[test]
    fn test_apply_changes_rejects_negative() {
        let mut entry = DuesEntry::regular(MemberId::new(), august(), Money::from_units(30));
        let result = entry.apply_changes(&EntryChanges::new().amount(Money::from_cents(-1)));
        assert!(matches!(result, Err(DuesValidationError::NegativeAmount(_))));
        assert_eq!(entry.amount, Money::from_units(30));
    }

    #[test]
    fn test_benefit_amount_cannot_change() {
        let mut entry = DuesEntry::new(
            MemberId::new(),
            august(),
            Money::zero(),
            PaymentKind::QuickPayBenefit {
                group_id: PaymentGroupId::new(),
            },
        );
        let result = entry.apply_changes(&EntryChanges::new().amount(Money::from_units(5)));
        assert_eq!(result, Err(DuesValidationError::BenefitAmount));

        // Notes on a benefit month are fine
        assert!(entry
            .apply_changes(&EntryChanges::new().note(Some("free month".into())))
            .is_ok());
    }

    #[test]
    fn test_serialization_tags_kind() {
        let group_id = PaymentGroupId::new();
        let entry = DuesEntry::new(
            MemberId::new(),
            august(),
            Money::from_units(40),
            PaymentKind::QuickPay { group_id },
        );

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"]["type"], "quick_pay");
        assert_eq!(json["amount"], 4000);

        let back: DuesEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, PaymentKind::QuickPay { group_id });
    }
}
