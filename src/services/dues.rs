//! Dues service
//!
//! Ledger queries plus the direct administrative actions on single entries:
//! editing one entry in place and deleting it. Neither touches any other
//! slot.

use log::warn;

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LodgeError, LodgeResult};
use crate::models::{DuesEntry, DuesEntryId, EntryChanges, FiscalYearWindow, MemberId, Money};
use crate::storage::{DuesStore, Storage};

use super::ledger::{LedgerSlot, LedgerSnapshot};

pub struct DuesService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// Money position of one member for one fiscal year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberBalance {
    pub window: FiscalYearWindow,
    pub monthly_fee: Money,
    pub paid_in_window: Money,
    pub outstanding: Money,
    /// All years
    pub accumulated_paid: Money,
}

/// A saved in-place edit
#[derive(Debug)]
pub struct EntryEdit {
    pub before: DuesEntry,
    pub after: DuesEntry,
    pub audit_failure: Option<LodgeError>,
}

impl<'a> DuesService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    pub fn monthly_fee(&self) -> Money {
        self.settings.monthly_fee_base
    }

    fn require_member(&self, member_id: MemberId) -> LodgeResult<()> {
        self.storage
            .members
            .get(member_id)?
            .map(|_| ())
            .ok_or_else(|| LodgeError::member_not_found(member_id.to_string()))
    }

    /// Fresh snapshot of a member's ledger
    pub fn snapshot(
        &self,
        member_id: MemberId,
        window: FiscalYearWindow,
    ) -> LodgeResult<LedgerSnapshot> {
        self.require_member(member_id)?;
        LedgerSnapshot::capture(&self.storage.dues, member_id, window)
    }

    /// The twelve slots of a fiscal year
    pub fn ledger(
        &self,
        member_id: MemberId,
        window: FiscalYearWindow,
    ) -> LodgeResult<Vec<LedgerSlot>> {
        Ok(self.snapshot(member_id, window)?.slots(self.monthly_fee()))
    }

    pub fn balance(
        &self,
        member_id: MemberId,
        window: FiscalYearWindow,
    ) -> LodgeResult<MemberBalance> {
        let snapshot = self.snapshot(member_id, window)?;
        let fee = self.monthly_fee();

        Ok(MemberBalance {
            window,
            monthly_fee: fee,
            paid_in_window: snapshot.paid_in_window(),
            outstanding: snapshot.outstanding_balance(fee),
            accumulated_paid: snapshot.accumulated_paid(),
        })
    }

    pub fn get(&self, id: DuesEntryId) -> LodgeResult<Option<DuesEntry>> {
        self.storage.dues.get(id)
    }

    /// Find an entry by full id or the short id shown in listings
    pub fn find(&self, identifier: &str) -> LodgeResult<Option<DuesEntry>> {
        if let Ok(id) = identifier.parse::<DuesEntryId>() {
            return self.storage.dues.get(id);
        }

        let short = identifier.trim().to_lowercase();
        Ok(self
            .storage
            .dues
            .get_all()?
            .into_iter()
            .find(|e| e.id.to_string() == short))
    }

    pub fn resolve(&self, identifier: &str) -> LodgeResult<DuesEntry> {
        self.find(identifier)?
            .ok_or_else(|| LodgeError::entry_not_found(identifier))
    }

    /// Every entry, for export
    pub fn all_entries(&self) -> LodgeResult<Vec<DuesEntry>> {
        self.storage.dues.get_all()
    }

    pub fn member_entries(&self, member_id: MemberId) -> LodgeResult<Vec<DuesEntry>> {
        self.storage.dues.get_by_member(member_id)
    }

    /// Edit one entry in place
    ///
    /// Once the store has accepted the change the edit stands; a failure to
    /// append the audit record is logged and returned on the [`EntryEdit`].
    pub fn edit_entry(&self, id: DuesEntryId, changes: &EntryChanges) -> LodgeResult<EntryEdit> {
        let before = self
            .get(id)?
            .ok_or_else(|| LodgeError::entry_not_found(id.to_string()))?;

        changes
            .validate_for(&before)
            .map_err(|e| LodgeError::Validation(e.to_string()))?;

        let update = self.storage.dues.update(id, changes)?;
        let after = update.entry;

        let mut audit_failure = None;
        if !update.changes.is_empty() {
            if let Err(e) = self.storage.log_update(
                EntityType::DuesEntry,
                after.id.to_string(),
                Some(after.dues_month().to_string()),
                &before,
                &after,
                update.changes,
            ) {
                warn!("Edit of {} saved but not audited: {}", after.id, e);
                audit_failure = Some(e);
            }
        }

        Ok(EntryEdit {
            before,
            after,
            audit_failure,
        })
    }

    /// Remove an entry, freeing its slot
    pub fn delete_entry(&self, id: DuesEntryId) -> LodgeResult<DuesEntry> {
        let entry = self
            .storage
            .dues
            .delete(id)?
            .ok_or_else(|| LodgeError::entry_not_found(id.to_string()))?;

        if let Err(e) = self.storage.dues.save() {
            self.storage.dues.insert_entry(entry)?;
            return Err(e);
        }

        self.storage.log_delete(
            EntityType::DuesEntry,
            entry.id.to_string(),
            Some(entry.dues_month().to_string()),
            &entry,
        )?;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LodgePaths;
    use crate::models::{DuesMonth, Member, PaymentGroupId, PaymentKind};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Member) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LodgePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let member = Member::new("Hiram Abif");
        storage.members.upsert(member.clone()).unwrap();
        (temp_dir, storage, member)
    }

    fn window() -> FiscalYearWindow {
        FiscalYearWindow::starting(2025)
    }

    #[test]
    fn test_balance() {
        let (_temp, storage, member) = setup();
        let settings = Settings::default();
        storage
            .dues
            .insert(DuesEntry::regular(
                member.id,
                DuesMonth::new(2025, 7),
                Money::from_units(30),
            ))
            .unwrap();
        storage
            .dues
            .insert(DuesEntry::regular(
                member.id,
                DuesMonth::new(2024, 8),
                Money::from_units(50),
            ))
            .unwrap();

        let balance = DuesService::new(&storage, &settings)
            .balance(member.id, window())
            .unwrap();

        assert_eq!(balance.paid_in_window, Money::from_units(30));
        assert_eq!(balance.outstanding, Money::from_units(570));
        assert_eq!(balance.accumulated_paid, Money::from_units(80));
    }

    #[test]
    fn test_unknown_member_is_not_found() {
        let (_temp, storage, _member) = setup();
        let settings = Settings::default();
        let err = DuesService::new(&storage, &settings)
            .ledger(MemberId::new(), window())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_edit_touches_only_one_slot() {
        let (_temp, storage, member) = setup();
        let settings = Settings::default();
        let service = DuesService::new(&storage, &settings);

        let target = storage
            .dues
            .insert(DuesEntry::regular(
                member.id,
                DuesMonth::new(2025, 9),
                Money::from_units(20),
            ))
            .unwrap();
        let other = storage
            .dues
            .insert(DuesEntry::regular(
                member.id,
                DuesMonth::new(2025, 7),
                Money::from_units(10),
            ))
            .unwrap();

        // more than the fee, still no redistribution
        let edit = service
            .edit_entry(target.id, &EntryChanges::new().amount(Money::from_units(90)))
            .unwrap();

        assert_eq!(edit.before.amount, Money::from_units(20));
        assert_eq!(edit.after.amount, Money::from_units(90));
        assert!(edit.audit_failure.is_none());
        assert_eq!(storage.dues.count().unwrap(), 2);
        assert_eq!(
            storage.dues.get(other.id).unwrap().unwrap().amount,
            Money::from_units(10)
        );
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_rejects_negative_and_benefit_amounts() {
        let (_temp, storage, member) = setup();
        let settings = Settings::default();
        let service = DuesService::new(&storage, &settings);

        let benefit = storage
            .dues
            .insert(DuesEntry::new(
                member.id,
                DuesMonth::new(2026, 6),
                Money::zero(),
                PaymentKind::QuickPayBenefit {
                    group_id: PaymentGroupId::new(),
                },
            ))
            .unwrap();

        let err = service
            .edit_entry(benefit.id, &EntryChanges::new().amount(Money::from_units(5)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .edit_entry(benefit.id, &EntryChanges::new().amount(Money::from_units(-5)))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_edit_stands_when_audit_log_is_unwritable() {
        let (_temp, storage, member) = setup();
        let settings = Settings::default();
        let service = DuesService::new(&storage, &settings);
        let entry = storage
            .dues
            .insert(DuesEntry::regular(
                member.id,
                DuesMonth::new(2025, 8),
                Money::from_units(20),
            ))
            .unwrap();

        let audit_path = storage.paths().audit_log();
        let _ = std::fs::remove_file(&audit_path);
        std::fs::create_dir_all(&audit_path).unwrap();

        let edit = service
            .edit_entry(entry.id, &EntryChanges::new().amount(Money::from_units(50)))
            .unwrap();

        assert!(edit.audit_failure.is_some());
        assert_eq!(edit.after.amount, Money::from_units(50));
        assert_eq!(
            storage.dues.get(entry.id).unwrap().unwrap().amount,
            Money::from_units(50)
        );
    }

    #[test]
    fn test_delete_frees_slot() {
        let (_temp, storage, member) = setup();
        let settings = Settings::default();
        let service = DuesService::new(&storage, &settings);
        let month = DuesMonth::new(2025, 10);

        let entry = storage
            .dues
            .insert(DuesEntry::regular(member.id, month, Money::from_units(50)))
            .unwrap();

        let short = entry.id.to_string();
        let found = service.resolve(&short).unwrap();
        service.delete_entry(found.id).unwrap();

        assert!(storage.dues.find_slot(member.id, month).unwrap().is_none());
        assert!(service.delete_entry(entry.id).unwrap_err().is_not_found());
    }
}
