//! Receipt numbering and receipt data
//!
//! Numbers come from a persisted per-module counter. The receipt itself is
//! assembled from what a payment actually wrote, so a partially applied
//! plan never prints months that failed.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::LodgeResult;
use crate::models::{
    DuesEntry, Member, Money, PaymentReceipt, ReceiptLine, ReceiptModule, ReceiptRef,
};
use crate::storage::Storage;

use super::apply::ApplyReport;

pub struct ReceiptService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// Receipt lines for the slots a report applied, amount = money added
pub fn lines_from_report(report: &ApplyReport) -> Vec<ReceiptLine> {
    report
        .applied
        .iter()
        .map(|slot| ReceiptLine::new(slot.month, slot.delta(), slot.after.kind.tag()))
        .collect()
}

/// Receipt line for an in-place edit
pub fn line_for_edit(before: &DuesEntry, after: &DuesEntry) -> ReceiptLine {
    ReceiptLine::new(
        after.dues_month(),
        after.amount - before.amount,
        after.kind.tag(),
    )
}

impl<'a> ReceiptService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Take the next number of a module ("TRE-000001", ...)
    pub fn next_number(&self, module: ReceiptModule) -> LodgeResult<String> {
        let sequence = self.storage.receipts.next(module)?;

        self.storage.log_update(
            EntityType::ReceiptCounter,
            module.to_string(),
            None,
            &(sequence - 1),
            &sequence,
            vec![format!("issued {}", module.format_number(sequence))],
        )?;

        Ok(module.format_number(sequence))
    }

    /// Last number issued for a module, without taking a new one
    pub fn last_number(&self, module: ReceiptModule) -> LodgeResult<Option<String>> {
        let current = self.storage.receipts.current(module)?;
        Ok((current > 0).then(|| module.format_number(current)))
    }

    pub fn compose(
        &self,
        receipt_number: String,
        issued_on: NaiveDate,
        member: &Member,
        lines: Vec<ReceiptLine>,
        attachment: Option<ReceiptRef>,
    ) -> PaymentReceipt {
        let total: Money = lines.iter().map(|l| l.amount).sum();
        PaymentReceipt {
            receipt_number,
            issued_on,
            institution_name: self.settings.institution_name.clone(),
            treasurer_name: self.settings.treasurer_name.clone(),
            member_name: member.full_name.clone(),
            lines,
            total,
            attachment,
        }
    }

    /// Number and compose a treasury receipt for applied dues
    pub fn issue(
        &self,
        issued_on: NaiveDate,
        member: &Member,
        lines: Vec<ReceiptLine>,
        attachment: Option<ReceiptRef>,
    ) -> LodgeResult<PaymentReceipt> {
        let number = self.next_number(ReceiptModule::Treasury)?;
        Ok(self.compose(number, issued_on, member, lines, attachment))
    }
}
