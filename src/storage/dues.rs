//! Dues entry repository for JSON storage
//!
//! Manages loading and saving dues entries to dues.json, and enforces the
//! one-entry-per-(member, month, year) constraint.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{LodgeError, LodgeResult};
use crate::models::{DuesEntry, DuesEntryId, DuesMonth, EntryChanges, MemberId, SlotKey};

use super::file_io::{read_json, write_json_atomic};

/// The store operations the payment engine depends on
///
/// Each call is one write; there is no multi-row transaction. `insert` must
/// fail with `LodgeError::Conflict` when the slot is already taken.
pub trait DuesStore {
    /// Entry occupying a slot, if any
    fn find_slot(&self, member_id: MemberId, month: DuesMonth) -> LodgeResult<Option<DuesEntry>>;

    /// Every entry of a member across all years
    fn member_entries(&self, member_id: MemberId) -> LodgeResult<Vec<DuesEntry>>;

    /// Persist a new entry
    fn insert(&self, entry: DuesEntry) -> LodgeResult<DuesEntry>;

    /// Apply field changes to an existing entry and persist it
    fn update(&self, id: DuesEntryId, changes: &EntryChanges) -> LodgeResult<EntryUpdate>;
}

/// A persisted update and the human-readable list of fields it changed
#[derive(Debug, Clone)]
pub struct EntryUpdate {
    pub entry: DuesEntry,
    pub changes: Vec<String>,
}

/// Serializable dues data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct DuesData {
    entries: Vec<DuesEntry>,
}

/// Repository for dues entry persistence with slot and member indexes
pub struct DuesRepository {
    path: PathBuf,
    data: RwLock<HashMap<DuesEntryId, DuesEntry>>,
    /// Index: (member, month) -> entry id; doubles as the uniqueness constraint
    by_slot: RwLock<HashMap<SlotKey, DuesEntryId>>,
    /// Index: member -> entry ids
    by_member: RwLock<HashMap<MemberId, Vec<DuesEntryId>>>,
}

fn lock_error(e: impl std::fmt::Display) -> LodgeError {
    LodgeError::StoreUnavailable(format!("Failed to acquire lock: {}", e))
}

impl DuesRepository {
    /// Create a new dues repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_slot: RwLock::new(HashMap::new()),
            by_member: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk and build indexes
    pub fn load(&self) -> LodgeResult<()> {
        let file_data: DuesData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_slot = self.by_slot.write().map_err(lock_error)?;
        let mut by_member = self.by_member.write().map_err(lock_error)?;

        data.clear();
        by_slot.clear();
        by_member.clear();

        for entry in file_data.entries {
            let key = entry.slot_key();
            if by_slot.insert(key, entry.id).is_some() {
                return Err(LodgeError::StoreUnavailable(format!(
                    "{} holds two entries for {}",
                    self.path.display(),
                    key
                )));
            }
            by_member.entry(entry.member_id).or_default().push(entry.id);
            data.insert(entry.id, entry);
        }

        Ok(())
    }

    /// Save entries to disk
    pub fn save(&self) -> LodgeResult<()> {
        let data = self.data.read().map_err(lock_error)?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| {
            a.member_id
                .cmp(&b.member_id)
                .then(a.dues_month().cmp(&b.dues_month()))
        });

        write_json_atomic(&self.path, &DuesData { entries })
    }

    /// Get an entry by ID
    pub fn get(&self, id: DuesEntryId) -> LodgeResult<Option<DuesEntry>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get the entry occupying a slot
    pub fn get_slot(&self, key: SlotKey) -> LodgeResult<Option<DuesEntry>> {
        let data = self.data.read().map_err(lock_error)?;
        let by_slot = self.by_slot.read().map_err(lock_error)?;
        Ok(by_slot.get(&key).and_then(|id| data.get(id)).cloned())
    }

    /// Get all entries of a member, oldest month first
    pub fn get_by_member(&self, member_id: MemberId) -> LodgeResult<Vec<DuesEntry>> {
        let data = self.data.read().map_err(lock_error)?;
        let by_member = self.by_member.read().map_err(lock_error)?;

        let ids = by_member.get(&member_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut entries: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        entries.sort_by_key(|e| e.dues_month());
        Ok(entries)
    }

    /// Get all entries, grouped by member and ordered by month
    pub fn get_all(&self) -> LodgeResult<Vec<DuesEntry>> {
        let data = self.data.read().map_err(lock_error)?;
        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| {
            a.member_id
                .cmp(&b.member_id)
                .then(a.dues_month().cmp(&b.dues_month()))
        });
        Ok(entries)
    }

    /// Insert a new entry in memory, rejecting an occupied slot
    pub fn insert_entry(&self, entry: DuesEntry) -> LodgeResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_slot = self.by_slot.write().map_err(lock_error)?;
        let mut by_member = self.by_member.write().map_err(lock_error)?;

        let key = entry.slot_key();
        if by_slot.contains_key(&key) {
            return Err(LodgeError::Conflict {
                month: entry.month,
                year: entry.year,
            });
        }

        by_slot.insert(key, entry.id);
        by_member.entry(entry.member_id).or_default().push(entry.id);
        data.insert(entry.id, entry);
        Ok(())
    }

    /// Replace an existing entry in memory; its slot must not change
    pub fn replace_entry(&self, entry: DuesEntry) -> LodgeResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;

        match data.get(&entry.id) {
            None => Err(LodgeError::entry_not_found(entry.id.to_string())),
            Some(old) if old.slot_key() != entry.slot_key() => Err(LodgeError::Validation(
                format!("Entry {} cannot move to another month", entry.id),
            )),
            Some(_) => {
                data.insert(entry.id, entry);
                Ok(())
            }
        }
    }

    /// Delete an entry, returning it if it existed
    pub fn delete(&self, id: DuesEntryId) -> LodgeResult<Option<DuesEntry>> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_slot = self.by_slot.write().map_err(lock_error)?;
        let mut by_member = self.by_member.write().map_err(lock_error)?;

        let removed = data.remove(&id);
        if let Some(entry) = &removed {
            by_slot.remove(&entry.slot_key());
            if let Some(ids) = by_member.get_mut(&entry.member_id) {
                ids.retain(|&eid| eid != id);
            }
        }
        Ok(removed)
    }

    /// Count entries
    pub fn count(&self) -> LodgeResult<usize> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

impl DuesStore for DuesRepository {
    fn find_slot(&self, member_id: MemberId, month: DuesMonth) -> LodgeResult<Option<DuesEntry>> {
        self.get_slot(SlotKey::new(member_id, month))
    }

    fn member_entries(&self, member_id: MemberId) -> LodgeResult<Vec<DuesEntry>> {
        self.get_by_member(member_id)
    }

    fn insert(&self, entry: DuesEntry) -> LodgeResult<DuesEntry> {
        self.insert_entry(entry.clone())?;

        if let Err(e) = self.save() {
            // Keep memory in line with what is on disk
            self.delete(entry.id)?;
            return Err(e);
        }

        Ok(entry)
    }

    fn update(&self, id: DuesEntryId, changes: &EntryChanges) -> LodgeResult<EntryUpdate> {
        let before = self
            .get(id)?
            .ok_or_else(|| LodgeError::entry_not_found(id.to_string()))?;

        let mut after = before.clone();
        let summary = after
            .apply_changes(changes)
            .map_err(|e| LodgeError::Validation(e.to_string()))?;

        self.replace_entry(after.clone())?;

        if let Err(e) = self.save() {
            self.replace_entry(before)?;
            return Err(e);
        }

        Ok(EntryUpdate {
            entry: after,
            changes: summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, DuesRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = DuesRepository::new(temp_dir.path().join("dues.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_insert_and_find_slot() {
        let (_temp_dir, repo) = create_test_repo();
        let member = MemberId::new();
        let month = DuesMonth::new(2025, 8);

        let entry = DuesEntry::regular(member, month, Money::from_units(50));
        repo.insert(entry.clone()).unwrap();

        let found = repo.find_slot(member, month).unwrap().unwrap();
        assert_eq!(found.id, entry.id);
        assert!(repo.find_slot(member, DuesMonth::new(2025, 9)).unwrap().is_none());
        assert!(repo
            .find_slot(MemberId::new(), month)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_slot_conflicts() {
        let (_temp_dir, repo) = create_test_repo();
        let member = MemberId::new();
        let month = DuesMonth::new(2025, 8);

        repo.insert(DuesEntry::regular(member, month, Money::from_units(50)))
            .unwrap();
        let err = repo
            .insert(DuesEntry::regular(member, month, Money::from_units(10)))
            .unwrap_err();

        assert!(matches!(err, LodgeError::Conflict { month: 8, year: 2025 }));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_update_applies_changes() {
        let (_temp_dir, repo) = create_test_repo();
        let member = MemberId::new();
        let entry = repo
            .insert(DuesEntry::regular(
                member,
                DuesMonth::new(2025, 7),
                Money::from_units(30),
            ))
            .unwrap();

        let updated = repo
            .update(entry.id, &EntryChanges::new().amount(Money::from_units(50)))
            .unwrap();
        assert_eq!(updated.entry.amount, Money::from_units(50));
        assert_eq!(updated.changes, vec!["amount: $30.00 -> $50.00".to_string()]);
        assert_eq!(repo.get(entry.id).unwrap().unwrap().amount, Money::from_units(50));

        let missing = repo.update(DuesEntryId::new(), &EntryChanges::new());
        assert!(missing.unwrap_err().is_not_found());
    }

    #[test]
    fn test_get_by_member_is_chronological() {
        let (_temp_dir, repo) = create_test_repo();
        let member = MemberId::new();

        for (year, month) in [(2026, 2), (2025, 7), (2025, 12)] {
            repo.insert_entry(DuesEntry::regular(
                member,
                DuesMonth::new(year, month),
                Money::from_units(50),
            ))
            .unwrap();
        }

        let months: Vec<_> = repo
            .get_by_member(member)
            .unwrap()
            .iter()
            .map(|e| e.dues_month())
            .collect();
        assert_eq!(
            months,
            vec![
                DuesMonth::new(2025, 7),
                DuesMonth::new(2025, 12),
                DuesMonth::new(2026, 2)
            ]
        );
    }

    #[test]
    fn test_delete_frees_slot() {
        let (_temp_dir, repo) = create_test_repo();
        let member = MemberId::new();
        let month = DuesMonth::new(2025, 8);

        let entry = repo
            .insert(DuesEntry::regular(member, month, Money::from_units(50)))
            .unwrap();
        assert!(repo.delete(entry.id).unwrap().is_some());
        assert!(repo.find_slot(member, month).unwrap().is_none());

        repo.insert(DuesEntry::regular(member, month, Money::from_units(20)))
            .unwrap();
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let member = MemberId::new();
        repo.insert(DuesEntry::regular(
            member,
            DuesMonth::new(2025, 8),
            Money::from_units(50),
        ))
        .unwrap();

        let repo2 = DuesRepository::new(temp_dir.path().join("dues.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get_by_member(member).unwrap().len(), 1);
    }
}
