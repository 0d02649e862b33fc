//! Fee service
//!
//! Records extraordinary and degree fees. A fee takes its receipt number
//! from the series of its kind before it is saved, so the stored record
//! always names the receipt that was printed for it.

use chrono::NaiveDate;
use log::{info, warn};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LodgeError, LodgeResult};
use crate::models::{
    DuesMonth, FeeKind, FeeRecord, MemberId, Money, PaymentReceipt, ReceiptLine, ReceiptRef,
};
use crate::storage::Storage;

use super::receipt::ReceiptService;

pub struct FeeService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// A fee to record
#[derive(Debug, Clone)]
pub struct FeeInput {
    pub member_id: MemberId,
    pub kind: FeeKind,
    pub amount: Money,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub attachment: Option<ReceiptRef>,
    pub issue_receipt: bool,
}

/// A saved fee with the receipt issued for it
#[derive(Debug)]
pub struct RecordedFee {
    pub fee: FeeRecord,
    pub receipt: Option<PaymentReceipt>,
    pub audit_failure: Option<LodgeError>,
}

impl<'a> FeeService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    pub fn record(&self, input: FeeInput) -> LodgeResult<RecordedFee> {
        let member = self
            .storage
            .members
            .get(input.member_id)?
            .ok_or_else(|| LodgeError::member_not_found(input.member_id.to_string()))?;

        let mut fee = FeeRecord::new(member.id, input.kind, input.amount, input.date)
            .with_note(input.note)
            .with_attachment(input.attachment);
        fee.validate()
            .map_err(|e| LodgeError::Validation(e.to_string()))?;

        let receipts = ReceiptService::new(self.storage, self.settings);
        if input.issue_receipt {
            fee.receipt_number = Some(receipts.next_number(fee.kind.receipt_module())?);
        }

        self.storage.fees.insert(fee.clone())?;
        info!("Recorded {} fee {} of {}", fee.kind, fee.id, fee.amount);

        let audit_failure = self
            .storage
            .log_create(
                EntityType::Fee,
                fee.id.to_string(),
                Some(member.full_name.clone()),
                &fee,
            )
            .err();
        if let Some(e) = &audit_failure {
            warn!("Fee {} saved but not audited: {}", fee.id, e);
        }

        let receipt = fee.receipt_number.clone().map(|number| {
            let line = ReceiptLine::new(DuesMonth::from_date(fee.date), fee.amount, fee.kind.tag());
            receipts.compose(number, fee.date, &member, vec![line], fee.attachment.clone())
        });

        Ok(RecordedFee {
            fee,
            receipt,
            audit_failure,
        })
    }

    /// Fees, oldest first, optionally narrowed to one member or kind
    pub fn list(
        &self,
        member: Option<MemberId>,
        kind: Option<FeeKind>,
    ) -> LodgeResult<Vec<FeeRecord>> {
        let mut fees = match member {
            Some(id) => self.storage.fees.get_by_member(id)?,
            None => self.storage.fees.get_all()?,
        };
        if let Some(kind) = kind {
            fees.retain(|f| f.kind == kind);
        }
        Ok(fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LodgePaths;
    use crate::models::{Member, ReceiptModule};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Member, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LodgePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let member = Member::new("Hiram Abif");
        storage.members.upsert(member.clone()).unwrap();
        storage.members.save().unwrap();

        let settings = Settings {
            institution_name: "Lodge Harmony No. 7".into(),
            ..Settings::default()
        };
        (temp_dir, storage, member, settings)
    }

    fn input(member_id: MemberId, kind: FeeKind, units: i64) -> FeeInput {
        FeeInput {
            member_id,
            kind,
            amount: Money::from_units(units),
            date: NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
            note: None,
            attachment: None,
            issue_receipt: true,
        }
    }

    #[test]
    fn test_degree_fee_gets_degree_receipt() {
        let (_temp, storage, member, settings) = setup();
        let service = FeeService::new(&storage, &settings);

        let recorded = service
            .record(input(member.id, FeeKind::Degree, 300))
            .unwrap();

        assert_eq!(recorded.fee.receipt_number.as_deref(), Some("DEG-000001"));
        assert!(recorded.audit_failure.is_none());
        let receipt = recorded.receipt.unwrap();
        assert_eq!(receipt.receipt_number, "DEG-000001");
        assert_eq!(receipt.total, Money::from_units(300));
        assert_eq!(receipt.member_name, "Hiram Abif");
        assert_eq!(receipt.lines[0].payment_type, "degree_fee");

        let stored = storage.fees.get(recorded.fee.id).unwrap().unwrap();
        assert_eq!(stored.receipt_number.as_deref(), Some("DEG-000001"));
        let history = storage
            .audit()
            .history_of(&recorded.fee.id.to_string())
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_fee_series_are_independent_of_treasury() {
        let (_temp, storage, member, settings) = setup();
        let receipts = ReceiptService::new(&storage, &settings);
        receipts.next_number(ReceiptModule::Treasury).unwrap();

        let service = FeeService::new(&storage, &settings);
        let first = service
            .record(input(member.id, FeeKind::Extraordinary, 20))
            .unwrap();
        let second = service
            .record(input(member.id, FeeKind::Extraordinary, 35))
            .unwrap();
        let degree = service
            .record(input(member.id, FeeKind::Degree, 300))
            .unwrap();

        assert_eq!(first.fee.receipt_number.as_deref(), Some("EXT-000001"));
        assert_eq!(second.fee.receipt_number.as_deref(), Some("EXT-000002"));
        assert_eq!(degree.fee.receipt_number.as_deref(), Some("DEG-000001"));
        assert_eq!(
            receipts.last_number(ReceiptModule::Treasury).unwrap().as_deref(),
            Some("TRE-000001")
        );
    }

    #[test]
    fn test_fee_without_receipt_takes_no_number() {
        let (_temp, storage, member, settings) = setup();
        let service = FeeService::new(&storage, &settings);

        let mut plain = input(member.id, FeeKind::Extraordinary, 20);
        plain.issue_receipt = false;
        let recorded = service.record(plain).unwrap();

        assert!(recorded.receipt.is_none());
        assert!(recorded.fee.receipt_number.is_none());
        let receipts = ReceiptService::new(&storage, &settings);
        assert_eq!(receipts.last_number(ReceiptModule::Extraordinary).unwrap(), None);
    }

    #[test]
    fn test_invalid_fee_is_rejected_before_numbering() {
        let (_temp, storage, member, settings) = setup();
        let service = FeeService::new(&storage, &settings);

        let err = service
            .record(input(member.id, FeeKind::Degree, 0))
            .unwrap_err();
        assert!(err.is_validation());
        let err = service
            .record(input(MemberId::new(), FeeKind::Degree, 300))
            .unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(storage.fees.count().unwrap(), 0);
        let receipts = ReceiptService::new(&storage, &settings);
        assert_eq!(receipts.last_number(ReceiptModule::Degree).unwrap(), None);
    }

    #[test]
    fn test_fee_stands_when_audit_log_is_unwritable() {
        let (_temp, storage, member, settings) = setup();
        let service = FeeService::new(&storage, &settings);
        let audit_path = storage.paths().audit_log();
        let _ = std::fs::remove_file(&audit_path);
        std::fs::create_dir_all(&audit_path).unwrap();

        let mut plain = input(member.id, FeeKind::Extraordinary, 20);
        plain.issue_receipt = false;
        let recorded = service.record(plain).unwrap();

        assert!(recorded.audit_failure.is_some());
        assert_eq!(storage.fees.count().unwrap(), 1);
    }

    #[test]
    fn test_list_filters_by_member_and_kind() {
        let (_temp, storage, member, settings) = setup();
        let other = Member::new("Jabal Tubal");
        storage.members.upsert(other.clone()).unwrap();
        let service = FeeService::new(&storage, &settings);

        service
            .record(input(member.id, FeeKind::Degree, 300))
            .unwrap();
        service
            .record(input(member.id, FeeKind::Extraordinary, 20))
            .unwrap();
        service
            .record(input(other.id, FeeKind::Degree, 300))
            .unwrap();

        assert_eq!(service.list(None, None).unwrap().len(), 3);
        assert_eq!(service.list(Some(member.id), None).unwrap().len(), 2);
        assert_eq!(service.list(None, Some(FeeKind::Degree)).unwrap().len(), 2);
        assert_eq!(
            service
                .list(Some(member.id), Some(FeeKind::Extraordinary))
                .unwrap()
                .len(),
            1
        );
    }
}
