//! Read-only ledger views
//!
//! A [`LedgerSnapshot`] is taken from the store right before a computation
//! and never refreshed; every aggregate below is derived from it.

use std::collections::HashMap;

use crate::error::LodgeResult;
use crate::models::{
    DuesEntry, DuesMonth, FiscalYearWindow, MemberId, Money, SlotKey, FISCAL_MONTHS,
};
use crate::storage::DuesStore;

/// State of one fiscal-year slot at a given monthly fee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// No entry
    Empty,
    /// Entry below the fee
    Partial { paid: Money, deficit: Money },
    /// Entry at or above the fee
    Paid,
    /// Free quick-pay month
    Benefit,
}

impl SlotStatus {
    pub fn of(entry: Option<&DuesEntry>, monthly_fee: Money) -> Self {
        match entry {
            None => Self::Empty,
            Some(e) if e.is_benefit() => Self::Benefit,
            Some(e) if e.amount >= monthly_fee => Self::Paid,
            Some(e) => Self::Partial {
                paid: e.amount,
                deficit: monthly_fee.saturating_deficit(e.amount),
            },
        }
    }

    /// Money still owed on the slot
    pub fn deficit(&self, monthly_fee: Money) -> Money {
        match self {
            Self::Empty => monthly_fee,
            Self::Partial { deficit, .. } => *deficit,
            Self::Paid | Self::Benefit => Money::zero(),
        }
    }

    /// Whether the allocator may put money here
    pub fn accepts_money(&self) -> bool {
        matches!(self, Self::Empty | Self::Partial { .. })
    }
}

/// One cell of the fiscal-year grid
#[derive(Debug, Clone)]
pub struct LedgerSlot {
    pub index: usize,
    pub month: DuesMonth,
    pub entry: Option<DuesEntry>,
    pub status: SlotStatus,
}

/// A member's entries as read from the store, viewed through one fiscal window
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    member_id: MemberId,
    window: FiscalYearWindow,
    entries: HashMap<SlotKey, DuesEntry>,
}

impl LedgerSnapshot {
    /// Build a snapshot from already-fetched entries; other members' entries are dropped
    pub fn new(
        member_id: MemberId,
        window: FiscalYearWindow,
        entries: impl IntoIterator<Item = DuesEntry>,
    ) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| e.member_id == member_id)
            .map(|e| (e.slot_key(), e))
            .collect();

        Self {
            member_id,
            window,
            entries,
        }
    }

    /// Read every entry of the member from the store
    pub fn capture<S: DuesStore + ?Sized>(
        store: &S,
        member_id: MemberId,
        window: FiscalYearWindow,
    ) -> LodgeResult<Self> {
        let entries = store.member_entries(member_id)?;
        Ok(Self::new(member_id, window, entries))
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn window(&self) -> FiscalYearWindow {
        self.window
    }

    pub fn lookup(&self, month: DuesMonth) -> Option<&DuesEntry> {
        self.entries.get(&SlotKey::new(self.member_id, month))
    }

    /// Entry at a fiscal index of the window
    pub fn lookup_index(&self, index: usize) -> Option<&DuesEntry> {
        self.lookup(self.window.month_at(index))
    }

    pub fn status_at(&self, index: usize, monthly_fee: Money) -> SlotStatus {
        SlotStatus::of(self.lookup_index(index), monthly_fee)
    }

    /// The twelve slots of the window in fiscal order
    pub fn slots(&self, monthly_fee: Money) -> Vec<LedgerSlot> {
        (0..FISCAL_MONTHS)
            .map(|index| {
                let entry = self.lookup_index(index).cloned();
                LedgerSlot {
                    index,
                    month: self.window.month_at(index),
                    status: SlotStatus::of(entry.as_ref(), monthly_fee),
                    entry,
                }
            })
            .collect()
    }

    /// Sum of what is still owed across the window; benefit months owe nothing
    pub fn outstanding_balance(&self, monthly_fee: Money) -> Money {
        (0..FISCAL_MONTHS)
            .map(|i| self.status_at(i, monthly_fee).deficit(monthly_fee))
            .sum()
    }

    /// Everything the member ever paid, all years, benefit months excluded
    pub fn accumulated_paid(&self) -> Money {
        self.entries.values().map(DuesEntry::counted_amount).sum()
    }

    /// Paid within this window only
    pub fn paid_in_window(&self) -> Money {
        (0..FISCAL_MONTHS)
            .filter_map(|i| self.lookup_index(i))
            .map(DuesEntry::counted_amount)
            .sum()
    }

    /// Fiscal indices with no entry at all
    pub fn empty_indices(&self) -> Vec<usize> {
        (0..FISCAL_MONTHS)
            .filter(|&i| self.lookup_index(i).is_none())
            .collect()
    }
}
