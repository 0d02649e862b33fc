//! Bulk payment strategies
//!
//! Quick-pay covers the empty months of a fiscal year at a flat rate and
//! grants the twelfth month free. Advance-pay charges the full fee for an
//! explicit list of months. Both produce a [`BulkPlan`] of new entries
//! sharing one group id.

use std::collections::HashSet;

use chrono::NaiveDate;
use log::info;

use crate::error::{LodgeError, LodgeResult};
use crate::models::{DuesEntry, DuesMonth, MemberId, Money, PaymentGroupId, PaymentKind, ReceiptRef};

use super::ledger::LedgerSnapshot;

/// Paid months in a full quick-pay year; the next one is free
pub const QUICK_PAY_PAID_MONTHS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkKind {
    QuickPay,
    AdvancePay,
}

impl std::fmt::Display for BulkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuickPay => write!(f, "quick-pay"),
            Self::AdvancePay => write!(f, "advance-pay"),
        }
    }
}

/// Entries to create for one bulk payment
#[derive(Debug, Clone)]
pub struct BulkPlan {
    pub kind: BulkKind,
    pub member_id: MemberId,
    pub group_id: PaymentGroupId,
    /// New entries in chronological order
    pub entries: Vec<DuesEntry>,
    /// Money charged for the whole batch
    pub total: Money,
}

impl BulkPlan {
    pub fn months(&self) -> Vec<DuesMonth> {
        self.entries.iter().map(DuesEntry::dues_month).collect()
    }

    pub fn benefit(&self) -> Option<&DuesEntry> {
        self.entries.iter().find(|e| e.is_benefit())
    }
}

/// Payment date, receipt and note written onto every entry a payment touches
#[derive(Debug, Clone, Default)]
pub struct PaymentDetails {
    pub payment_date: Option<NaiveDate>,
    pub receipt: Option<ReceiptRef>,
    pub note: Option<String>,
}

impl PaymentDetails {
    fn require_date(&self) -> LodgeResult<NaiveDate> {
        self.payment_date.ok_or_else(|| {
            LodgeError::Validation("A payment date is required for bulk payments".into())
        })
    }

    fn stamp(&self, entry: DuesEntry, date: NaiveDate) -> DuesEntry {
        entry
            .with_payment_date(date)
            .with_receipt(self.receipt.clone())
            .with_note(self.note.clone())
    }
}

/// Plan a quick-pay over the empty months of the snapshot's window
///
/// # Errors
///
/// - `Validation` if the monthly amount is not positive or no date is given
/// - `NoEligibleSlots` if every month of the window already has an entry
pub fn plan_quick_pay(
    snapshot: &LedgerSnapshot,
    monthly_amount: Money,
    details: &PaymentDetails,
) -> LodgeResult<BulkPlan> {
    if !monthly_amount.is_positive() {
        return Err(LodgeError::Validation(format!(
            "Quick-pay amount per month must be greater than zero, got {}",
            monthly_amount
        )));
    }
    let date = details.require_date()?;

    let window = snapshot.window();
    let eligible = snapshot.empty_indices();
    if eligible.is_empty() {
        return Err(LodgeError::NoEligibleSlots {
            member: snapshot.member_id().to_string(),
            fiscal_year: window.to_string(),
        });
    }

    let group_id = PaymentGroupId::new();
    let member_id = snapshot.member_id();

    let entries: Vec<DuesEntry> = eligible
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            let (amount, kind) = if position < QUICK_PAY_PAID_MONTHS {
                (monthly_amount, PaymentKind::QuickPay { group_id })
            } else {
                (Money::zero(), PaymentKind::QuickPayBenefit { group_id })
            };
            let entry = DuesEntry::new(member_id, window.month_at(index), amount, kind);
            details.stamp(entry, date)
        })
        .collect();

    let total = entries.iter().map(|e| e.amount).sum();
    info!(
        "Planned quick-pay {} for {}: {} month(s) at {}, total {}",
        group_id,
        window,
        entries.len(),
        monthly_amount,
        total
    );

    Ok(BulkPlan {
        kind: BulkKind::QuickPay,
        member_id,
        group_id,
        entries,
        total,
    })
}

/// Plan an advance payment of the full fee for each selected month
///
/// Occupied months are not checked here; the store rejects them one by one.
///
/// # Errors
///
/// `Validation` for an empty or duplicated selection, an invalid month, a
/// non-positive fee, or a missing date.
pub fn plan_advance_pay(
    member_id: MemberId,
    months: &[DuesMonth],
    monthly_fee: Money,
    details: &PaymentDetails,
) -> LodgeResult<BulkPlan> {
    if months.is_empty() {
        return Err(LodgeError::Validation(
            "Select at least one month to pay in advance".into(),
        ));
    }
    if !monthly_fee.is_positive() {
        return Err(LodgeError::Validation(format!(
            "Monthly fee must be greater than zero, got {}",
            monthly_fee
        )));
    }

    let mut seen = HashSet::new();
    for month in months {
        if !month.is_valid() {
            return Err(LodgeError::Validation(format!(
                "Invalid month {:02} in advance-pay selection",
                month.month
            )));
        }
        if !seen.insert(*month) {
            return Err(LodgeError::Validation(format!(
                "{} is selected more than once",
                month
            )));
        }
    }
    let date = details.require_date()?;

    let group_id = PaymentGroupId::new();
    let mut selected = months.to_vec();
    selected.sort();

    let entries: Vec<DuesEntry> = selected
        .into_iter()
        .map(|month| {
            let entry = DuesEntry::new(
                member_id,
                month,
                monthly_fee,
                PaymentKind::AdvancePay { group_id },
            );
            details.stamp(entry, date)
        })
        .collect();

    let total = monthly_fee * entries.len() as i64;
    info!(
        "Planned advance-pay {}: {} month(s), total {}",
        group_id,
        entries.len(),
        total
    );

    Ok(BulkPlan {
        kind: BulkKind::AdvancePay,
        member_id,
        group_id,
        entries,
        total,
    })
}
