//! Payment service
//!
//! Entry point for money coming in. A payment against an empty month goes
//! through the allocator; a payment against a month that already has an
//! entry edits that entry and nothing else. Quick-pay and advance-pay are
//! bulk strategies over the same store.

use chrono::{Local, NaiveDate};
use log::{info, warn};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LodgeError, LodgeResult};
use crate::models::{
    DuesEntry, DuesMonth, EntryChanges, FiscalYearWindow, Member, MemberId, Money, ReceiptRef,
};
use crate::storage::Storage;

use super::allocator::{allocate, AllocationPlan};
use super::apply::{apply_bulk, apply_plan, ApplyReport};
use super::bulk::{plan_advance_pay, plan_quick_pay, BulkPlan, PaymentDetails};
use super::dues::{DuesService, EntryEdit};

pub struct PaymentService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// One payment against one month
#[derive(Debug, Clone)]
pub struct PaymentInput {
    pub member_id: MemberId,
    pub month: DuesMonth,
    pub amount: Money,
    /// Defaults to today
    pub payment_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub receipt: Option<ReceiptRef>,
}

#[derive(Debug, Clone)]
pub struct QuickPayInput {
    pub member_id: MemberId,
    pub window: FiscalYearWindow,
    pub monthly_amount: Money,
    pub payment_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub receipt: Option<ReceiptRef>,
}

#[derive(Debug, Clone)]
pub struct AdvancePayInput {
    pub member_id: MemberId,
    pub months: Vec<DuesMonth>,
    pub payment_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub receipt: Option<ReceiptRef>,
}

/// What a payment would do, before anything is written
#[derive(Debug, Clone)]
pub enum PaymentPreview {
    /// The month already has an entry; it would be edited in place
    Edit { existing: DuesEntry, new_amount: Money },
    Allocate(AllocationPlan),
}

#[derive(Debug)]
pub enum PaymentOutcome {
    Edited(EntryEdit),
    Allocated {
        plan: AllocationPlan,
        report: ApplyReport,
    },
}

impl PaymentOutcome {
    /// Money newly recorded by this payment
    pub fn amount_recorded(&self) -> Money {
        match self {
            Self::Edited(edit) => edit.after.amount - edit.before.amount,
            Self::Allocated { report, .. } => report.amount_applied(),
        }
    }

    /// Audit error raised after the ledger writes were already saved
    pub fn audit_failure(&self) -> Option<&LodgeError> {
        match self {
            Self::Edited(edit) => edit.audit_failure.as_ref(),
            Self::Allocated { report, .. } => report.audit_failure.as_ref(),
        }
    }
}

impl<'a> PaymentService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    fn dues(&self) -> DuesService<'a> {
        DuesService::new(self.storage, self.settings)
    }

    fn payer(&self, member_id: MemberId) -> LodgeResult<Member> {
        let member = self
            .storage
            .members
            .get(member_id)?
            .ok_or_else(|| LodgeError::member_not_found(member_id.to_string()))?;

        if !member.is_active() {
            warn!("Recording dues for inactive member {}", member.full_name);
        }
        Ok(member)
    }

    /// Work out what a payment would do without writing anything
    pub fn preview(
        &self,
        member_id: MemberId,
        month: DuesMonth,
        amount: Money,
    ) -> LodgeResult<PaymentPreview> {
        self.payer(member_id)?;
        let snapshot = self
            .dues()
            .snapshot(member_id, FiscalYearWindow::containing(month))?;

        if let Some(existing) = snapshot.lookup(month) {
            if amount.is_negative() {
                return Err(LodgeError::Validation(format!(
                    "Dues amount cannot be negative ({})",
                    amount
                )));
            }
            return Ok(PaymentPreview::Edit {
                existing: existing.clone(),
                new_amount: amount,
            });
        }

        let plan = allocate(&snapshot, month, amount, self.settings.monthly_fee_base)?;
        Ok(PaymentPreview::Allocate(plan))
    }

    /// Record a payment against one month
    pub fn pay_month(&self, input: PaymentInput) -> LodgeResult<PaymentOutcome> {
        let payment_date = input
            .payment_date
            .unwrap_or_else(|| Local::now().date_naive());

        match self.preview(input.member_id, input.month, input.amount)? {
            PaymentPreview::Edit { existing, .. } => {
                let mut changes = EntryChanges::new()
                    .amount(input.amount)
                    .payment_date(payment_date);
                if input.note.is_some() {
                    changes = changes.note(input.note);
                }
                if let Some(receipt) = input.receipt {
                    changes = changes.receipt(receipt);
                }

                info!("{} already has an entry; editing it in place", input.month);
                let edit = self.dues().edit_entry(existing.id, &changes)?;
                Ok(PaymentOutcome::Edited(edit))
            }
            PaymentPreview::Allocate(plan) => {
                let details = PaymentDetails {
                    payment_date: Some(payment_date),
                    receipt: input.receipt,
                    note: input.note,
                };
                let mut report = apply_plan(&self.storage.dues, &plan, &details);
                self.audit_report(&mut report);
                Ok(PaymentOutcome::Allocated { plan, report })
            }
        }
    }

    pub fn preview_quick_pay(&self, input: &QuickPayInput) -> LodgeResult<BulkPlan> {
        self.payer(input.member_id)?;
        let snapshot = self.dues().snapshot(input.member_id, input.window)?;
        let details = PaymentDetails {
            payment_date: input.payment_date,
            receipt: input.receipt.clone(),
            note: input.note.clone(),
        };

        plan_quick_pay(&snapshot, input.monthly_amount, &details).map_err(|e| match e {
            LodgeError::NoEligibleSlots { fiscal_year, .. } => LodgeError::NoEligibleSlots {
                member: self.member_label(input.member_id),
                fiscal_year,
            },
            other => other,
        })
    }

    /// Pay every empty month of a fiscal year at a flat rate
    pub fn quick_pay(&self, input: &QuickPayInput) -> LodgeResult<(BulkPlan, ApplyReport)> {
        let plan = self.preview_quick_pay(input)?;
        let mut report = apply_bulk(&self.storage.dues, &plan);
        self.audit_report(&mut report);
        Ok((plan, report))
    }

    pub fn preview_advance_pay(&self, input: &AdvancePayInput) -> LodgeResult<BulkPlan> {
        self.payer(input.member_id)?;
        let details = PaymentDetails {
            payment_date: input.payment_date,
            receipt: input.receipt.clone(),
            note: input.note.clone(),
        };
        plan_advance_pay(
            input.member_id,
            &input.months,
            self.settings.monthly_fee_base,
            &details,
        )
    }

    /// Pay selected months ahead at the full fee
    pub fn advance_pay(&self, input: &AdvancePayInput) -> LodgeResult<(BulkPlan, ApplyReport)> {
        let plan = self.preview_advance_pay(input)?;
        let mut report = apply_bulk(&self.storage.dues, &plan);
        self.audit_report(&mut report);
        Ok((plan, report))
    }

    fn member_label(&self, member_id: MemberId) -> String {
        self.storage
            .members
            .get(member_id)
            .ok()
            .flatten()
            .map(|m| m.full_name)
            .unwrap_or_else(|| member_id.to_string())
    }

    /// Audit the applied slots; the writes stand whether or not this succeeds
    fn audit_report(&self, report: &mut ApplyReport) {
        if let Err(e) = self.write_audit(report) {
            warn!(
                "{} but the audit log could not be written: {}",
                report.summary(),
                e
            );
            report.audit_failure = Some(e);
        }
    }

    fn write_audit(&self, report: &ApplyReport) -> LodgeResult<()> {
        for slot in &report.applied {
            let label = Some(slot.month.to_string());
            match &slot.before {
                None => self.storage.log_create(
                    EntityType::DuesEntry,
                    slot.after.id.to_string(),
                    label,
                    &slot.after,
                )?,
                Some(before) => self.storage.log_update(
                    EntityType::DuesEntry,
                    slot.after.id.to_string(),
                    label,
                    before,
                    &slot.after,
                    slot.changes.clone(),
                )?,
            }
        }
        Ok(())
    }
}
