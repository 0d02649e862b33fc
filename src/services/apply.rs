//! Writing plans to the store
//!
//! Slots are written one at a time and each write persists on its own.
//! There is no rollback: a conflict on one slot is recorded and the rest
//! continue, while an unavailable store abandons whatever is left.

use log::{debug, info, warn};

use crate::error::LodgeError;
use crate::models::{DuesEntry, DuesMonth, EntryChanges, Money};
use crate::storage::DuesStore;

use super::allocator::{AllocationPlan, PlannedSlot};
use super::bulk::{BulkPlan, PaymentDetails};

/// A slot that was written
#[derive(Debug, Clone)]
pub struct AppliedSlot {
    pub month: DuesMonth,
    /// `None` for a newly created entry
    pub before: Option<DuesEntry>,
    pub after: DuesEntry,
    /// Fields a top-up changed; empty for a created entry
    pub changes: Vec<String>,
}

impl AppliedSlot {
    /// Money this write added to the slot
    pub fn delta(&self) -> Money {
        let before = self.before.as_ref().map(|e| e.amount).unwrap_or_default();
        self.after.amount - before
    }

    pub fn is_top_up(&self) -> bool {
        self.before.is_some()
    }
}

/// A slot whose write failed
#[derive(Debug)]
pub struct SlotFailure {
    pub month: DuesMonth,
    pub error: LodgeError,
}

/// Outcome of applying a plan
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: Vec<AppliedSlot>,
    pub failures: Vec<SlotFailure>,
    /// Slots never attempted because the store went away
    pub abandoned: Vec<DuesMonth>,
    /// Set when the writes stand but their audit records could not be appended
    pub audit_failure: Option<LodgeError>,
}

impl ApplyReport {
    pub fn succeeded(&self) -> usize {
        self.applied.len()
    }

    /// Slots in the plan
    pub fn total(&self) -> usize {
        self.applied.len() + self.failures.len() + self.abandoned.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.abandoned.is_empty()
    }

    pub fn was_abandoned(&self) -> bool {
        !self.abandoned.is_empty()
    }

    /// Money actually written
    pub fn amount_applied(&self) -> Money {
        self.applied.iter().map(AppliedSlot::delta).sum()
    }

    /// "k of N slots applied"
    pub fn summary(&self) -> String {
        format!("{} of {} slots applied", self.succeeded(), self.total())
    }
}

enum SlotWrite {
    Create(DuesEntry),
    TopUp {
        before: DuesEntry,
        changes: EntryChanges,
    },
}

impl SlotWrite {
    fn month(&self) -> DuesMonth {
        match self {
            Self::Create(entry) => entry.dues_month(),
            Self::TopUp { before, .. } => before.dues_month(),
        }
    }
}

fn planned_write(plan: &AllocationPlan, slot: &PlannedSlot, details: &PaymentDetails) -> SlotWrite {
    match &slot.existing {
        None => {
            let mut entry = DuesEntry::regular(plan.member_id, slot.month, slot.amount)
                .with_note(details.note.clone())
                .with_receipt(details.receipt.clone());
            if let Some(date) = details.payment_date {
                entry = entry.with_payment_date(date);
            }
            SlotWrite::Create(entry)
        }
        Some(existing) => {
            let mut changes = EntryChanges::new().amount(slot.amount);
            if let Some(date) = details.payment_date {
                changes = changes.payment_date(date);
            }
            if existing.receipt.is_none() {
                if let Some(receipt) = &details.receipt {
                    changes = changes.receipt(receipt.clone());
                }
            }
            SlotWrite::TopUp {
                before: existing.clone(),
                changes,
            }
        }
    }
}

/// Write an allocation plan: create absent slots, top up partial ones
pub fn apply_plan<S: DuesStore + ?Sized>(
    store: &S,
    plan: &AllocationPlan,
    details: &PaymentDetails,
) -> ApplyReport {
    let writes = plan
        .slots
        .iter()
        .map(|slot| planned_write(plan, slot, details))
        .collect();
    run(store, writes)
}

/// Insert every entry of a bulk plan
pub fn apply_bulk<S: DuesStore + ?Sized>(store: &S, plan: &BulkPlan) -> ApplyReport {
    let writes = plan.entries.iter().cloned().map(SlotWrite::Create).collect();
    run(store, writes)
}

fn run<S: DuesStore + ?Sized>(store: &S, writes: Vec<SlotWrite>) -> ApplyReport {
    let mut report = ApplyReport::default();
    let mut pending = writes.into_iter();

    while let Some(write) = pending.next() {
        let month = write.month();
        let result = match write {
            SlotWrite::Create(entry) => store.insert(entry).map(|after| AppliedSlot {
                month,
                before: None,
                after,
                changes: Vec::new(),
            }),
            SlotWrite::TopUp { before, changes } => {
                store.update(before.id, &changes).map(|update| AppliedSlot {
                    month,
                    before: Some(before),
                    after: update.entry,
                    changes: update.changes,
                })
            }
        };

        match result {
            Ok(applied) => {
                debug!("wrote {} ({})", month, applied.after.amount);
                report.applied.push(applied);
            }
            Err(error) if error.is_store_unavailable() => {
                warn!("store unavailable while writing {}: {}", month, error);
                report.failures.push(SlotFailure { month, error });
                report.abandoned.extend(pending.by_ref().map(|w| w.month()));
            }
            Err(error) => {
                warn!("could not write {}: {}", month, error);
                report.failures.push(SlotFailure { month, error });
            }
        }
    }

    info!("{}", report.summary());
    report
}
