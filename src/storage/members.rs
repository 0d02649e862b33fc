//! Member repository for JSON storage
//!
//! Manages loading and saving the member roll to members.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{LodgeError, LodgeResult};
use crate::models::{Member, MemberId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable member data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MemberData {
    members: Vec<Member>,
}

/// Repository for member persistence
pub struct MemberRepository {
    path: PathBuf,
    data: RwLock<HashMap<MemberId, Member>>,
}

impl MemberRepository {
    /// Create a new member repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load members from disk
    pub fn load(&self) -> LodgeResult<()> {
        let file_data: MemberData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for member in file_data.members {
            data.insert(member.id, member);
        }

        Ok(())
    }

    /// Save members to disk
    pub fn save(&self) -> LodgeResult<()> {
        let data = self.data.read().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut members: Vec<_> = data.values().cloned().collect();
        members.sort_by(|a, b| a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()));

        write_json_atomic(&self.path, &MemberData { members })
    }

    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> LodgeResult<Option<Member>> {
        let data = self.data.read().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all members sorted by name
    pub fn get_all(&self) -> LodgeResult<Vec<Member>> {
        let data = self.data.read().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut members: Vec<_> = data.values().cloned().collect();
        members.sort_by(|a, b| a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()));
        Ok(members)
    }

    /// Find a member by full name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> LodgeResult<Option<Member>> {
        let data = self.data.read().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|m| m.full_name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert or update a member
    pub fn upsert(&self, member: Member) -> LodgeResult<()> {
        let mut data = self.data.write().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(member.id, member);
        Ok(())
    }

    /// Check if a member name is already taken by someone else
    pub fn name_exists(&self, name: &str, exclude_id: Option<MemberId>) -> LodgeResult<bool> {
        let data = self.data.read().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .any(|m| m.full_name.to_lowercase() == name_lower && Some(m.id) != exclude_id))
    }

    /// Count members
    pub fn count(&self) -> LodgeResult<usize> {
        let data = self.data.read().map_err(|e| {
            LodgeError::StoreUnavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, MemberRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = MemberRepository::new(temp_dir.path().join("members.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let member = Member::new("Hiram Abif");
        let id = member.id;

        repo.upsert(member).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.full_name, "Hiram Abif");
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_get_by_name_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Member::new("Hiram Abif")).unwrap();

        assert!(repo.get_by_name("hiram abif").unwrap().is_some());
        assert!(repo.get_by_name("Solomon").unwrap().is_none());
    }

    #[test]
    fn test_name_exists_excludes_self() {
        let (_temp_dir, repo) = create_test_repo();
        let member = Member::new("Hiram Abif");
        let id = member.id;
        repo.upsert(member).unwrap();

        assert!(repo.name_exists("HIRAM ABIF", None).unwrap());
        assert!(!repo.name_exists("Hiram Abif", Some(id)).unwrap());
    }

    #[test]
    fn test_save_and_reload_sorted() {
        let (temp_dir, repo) = create_test_repo();
        repo.upsert(Member::new("Zerubbabel")).unwrap();
        repo.upsert(Member::new("adoniram")).unwrap();
        repo.save().unwrap();

        let repo2 = MemberRepository::new(temp_dir.path().join("members.json"));
        repo2.load().unwrap();

        let names: Vec<_> = repo2
            .get_all()
            .unwrap()
            .into_iter()
            .map(|m| m.full_name)
            .collect();
        assert_eq!(names, vec!["adoniram", "Zerubbabel"]);
    }
}
