//! Single-payment distribution across the fiscal year
//!
//! A lump sum paid against an empty month first settles unpaid months that
//! come before it, then fills the target, then flows into later unpaid
//! months. Nothing here touches the store: the result is an
//! [`AllocationPlan`] that [`super::apply`] writes slot by slot.

use log::{debug, info, warn};

use crate::error::{LodgeError, LodgeResult};
use crate::models::{DuesEntry, DuesMonth, FiscalYearWindow, MemberId, Money, FISCAL_MONTHS};

use super::ledger::{LedgerSnapshot, SlotStatus};

/// Whether a planned slot is a new entry or an existing one topped up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    Create,
    TopUp,
}

/// One slot mutation of a plan
#[derive(Debug, Clone)]
pub struct PlannedSlot {
    pub index: usize,
    pub month: DuesMonth,
    /// Amount the slot will hold after the plan is applied
    pub amount: Money,
    /// Money this plan adds to the slot
    pub delta: Money,
    /// Entry already in the slot when the snapshot was taken
    pub existing: Option<DuesEntry>,
}

impl PlannedSlot {
    pub fn change(&self) -> SlotChange {
        if self.existing.is_some() {
            SlotChange::TopUp
        } else {
            SlotChange::Create
        }
    }
}

/// Proposed distribution of one lump sum
#[derive(Debug, Clone)]
pub struct AllocationPlan {
    pub member_id: MemberId,
    pub window: FiscalYearWindow,
    pub target: DuesMonth,
    pub lump_sum: Money,
    /// Mutations in fiscal order
    pub slots: Vec<PlannedSlot>,
    /// Part of the lump sum that no slot could take
    pub unallocated: Money,
}

impl AllocationPlan {
    pub fn total_allocated(&self) -> Money {
        self.slots.iter().map(|s| s.delta).sum()
    }

    /// More than one slot is touched, so the receipt covers several months
    pub fn needs_additional_receipt(&self) -> bool {
        self.slots.len() > 1
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_for(&self, month: DuesMonth) -> Option<&PlannedSlot> {
        self.slots.iter().find(|s| s.month == month)
    }
}

/// Distribute `lump_sum` paid against the empty `target` month
///
/// # Errors
///
/// - `Validation` if the lump sum or fee is not positive, or the target is
///   outside the snapshot's fiscal window
/// - `SlotOccupied` if the target already has an entry
pub fn allocate(
    snapshot: &LedgerSnapshot,
    target: DuesMonth,
    lump_sum: Money,
    monthly_fee: Money,
) -> LodgeResult<AllocationPlan> {
    if !lump_sum.is_positive() {
        return Err(LodgeError::Validation(format!(
            "Payment amount must be greater than zero, got {}",
            lump_sum
        )));
    }
    if !monthly_fee.is_positive() {
        return Err(LodgeError::Validation(format!(
            "Monthly fee must be greater than zero, got {}",
            monthly_fee
        )));
    }

    let window = snapshot.window();
    let target_index = window.index_of(target).ok_or_else(|| {
        LodgeError::Validation(format!("{} is not part of fiscal year {}", target, window))
    })?;

    if snapshot.lookup(target).is_some() {
        return Err(LodgeError::SlotOccupied {
            month: target.month,
            year: target.year,
        });
    }

    let mut remaining = lump_sum;
    let mut slots = Vec::new();

    // Backfill, earliest first
    for index in 0..target_index {
        if remaining.is_zero() {
            break;
        }
        if let Some(slot) = fill_slot(snapshot, index, monthly_fee, &mut remaining) {
            slots.push(slot);
        }
    }

    if remaining.is_positive() {
        let delta = remaining.min(monthly_fee);
        remaining -= delta;
        debug!("target {} receives {}", target, delta);
        slots.push(PlannedSlot {
            index: target_index,
            month: target,
            amount: delta,
            delta,
            existing: None,
        });
    }

    // Overflow into later months
    for index in (target_index + 1)..FISCAL_MONTHS {
        if remaining.is_zero() {
            break;
        }
        if let Some(slot) = fill_slot(snapshot, index, monthly_fee, &mut remaining) {
            slots.push(slot);
        }
    }

    let plan = AllocationPlan {
        member_id: snapshot.member_id(),
        window,
        target,
        lump_sum,
        slots,
        unallocated: remaining,
    };

    info!(
        "Planned {} for {} across {} slot(s) of {}",
        plan.total_allocated(),
        target,
        plan.slots.len(),
        window
    );
    if plan.unallocated.is_positive() {
        warn!(
            "{} of the {} payment exceeds what fiscal year {} still owes and was not allocated",
            plan.unallocated, lump_sum, window
        );
    }

    Ok(plan)
}

fn fill_slot(
    snapshot: &LedgerSnapshot,
    index: usize,
    monthly_fee: Money,
    remaining: &mut Money,
) -> Option<PlannedSlot> {
    let status = snapshot.status_at(index, monthly_fee);
    if !status.accepts_money() {
        return None;
    }

    let existing = snapshot.lookup_index(index).cloned();
    let paid = match status {
        SlotStatus::Partial { paid, .. } => paid,
        _ => Money::zero(),
    };
    let delta = (*remaining).min(status.deficit(monthly_fee));
    *remaining -= delta;

    let month = snapshot.window().month_at(index);
    debug!("slot {} ({}) receives {} on top of {}", index, month, delta, paid);

    Some(PlannedSlot {
        index,
        month,
        amount: paid + delta,
        delta,
        existing,
    })
}
