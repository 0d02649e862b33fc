//! Member service
//!
//! Roll keeping: add, edit, activate and deactivate members. Members are
//! never deleted because their dues history must stay attributable.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{LodgeError, LodgeResult};
use crate::models::{Member, MemberId, MemberStatus};
use crate::storage::Storage;

pub struct MemberService<'a> {
    storage: &'a Storage,
}

/// Fields for a new member
#[derive(Debug, Clone, Default)]
pub struct CreateMemberInput {
    pub full_name: String,
    pub dues_category: Option<String>,
    pub phone: Option<String>,
    pub joined_on: Option<NaiveDate>,
}

/// Field updates for a member; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateMemberInput {
    pub full_name: Option<String>,
    pub dues_category: Option<String>,
    pub phone: Option<String>,
    pub joined_on: Option<NaiveDate>,
}

impl<'a> MemberService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: CreateMemberInput) -> LodgeResult<Member> {
        let name = input.full_name.trim();
        if self.storage.members.name_exists(name, None)? {
            return Err(LodgeError::Validation(format!(
                "A member named '{}' already exists",
                name
            )));
        }

        let mut member = Member::new(name);
        if let Some(category) = input.dues_category {
            member.dues_category = category.trim().to_string();
        }
        member.phone = input.phone.filter(|p| !p.trim().is_empty());
        member.joined_on = input.joined_on;

        member
            .validate()
            .map_err(|e| LodgeError::Validation(e.to_string()))?;

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_create(
            EntityType::Member,
            member.id.to_string(),
            Some(member.full_name.clone()),
            &member,
        )?;

        Ok(member)
    }

    pub fn get(&self, id: MemberId) -> LodgeResult<Option<Member>> {
        self.storage.members.get(id)
    }

    /// Get a member or fail with `NotFound`
    pub fn require(&self, id: MemberId) -> LodgeResult<Member> {
        self.get(id)?
            .ok_or_else(|| LodgeError::member_not_found(id.to_string()))
    }

    /// Find a member by name, full id, or the short id shown in listings
    pub fn find(&self, identifier: &str) -> LodgeResult<Option<Member>> {
        if let Some(member) = self.storage.members.get_by_name(identifier)? {
            return Ok(Some(member));
        }

        if let Ok(id) = identifier.parse::<MemberId>() {
            return self.storage.members.get(id);
        }

        let short = identifier.trim().to_lowercase();
        Ok(self
            .storage
            .members
            .get_all()?
            .into_iter()
            .find(|m| m.id.to_string() == short))
    }

    /// Like [`find`](Self::find) but `NotFound` when nothing matches
    pub fn resolve(&self, identifier: &str) -> LodgeResult<Member> {
        self.find(identifier)?
            .ok_or_else(|| LodgeError::member_not_found(identifier))
    }

    /// Members sorted by name
    pub fn list(&self, include_inactive: bool) -> LodgeResult<Vec<Member>> {
        let mut members = self.storage.members.get_all()?;
        if !include_inactive {
            members.retain(Member::is_active);
        }
        Ok(members)
    }

    pub fn update(&self, id: MemberId, input: UpdateMemberInput) -> LodgeResult<Member> {
        let mut member = self.require(id)?;
        let before = member.clone();
        let mut changes = Vec::new();

        if let Some(name) = input.full_name {
            let name = name.trim().to_string();
            if name != member.full_name {
                if self.storage.members.name_exists(&name, Some(id))? {
                    return Err(LodgeError::Validation(format!(
                        "A member named '{}' already exists",
                        name
                    )));
                }
                changes.push(format!("full_name: {} -> {}", member.full_name, name));
                member.full_name = name;
            }
        }

        if let Some(category) = input.dues_category {
            let category = category.trim().to_string();
            if category != member.dues_category {
                changes.push(format!(
                    "dues_category: {} -> {}",
                    member.dues_category, category
                ));
                member.dues_category = category;
            }
        }

        if let Some(phone) = input.phone {
            let phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
            if phone != member.phone {
                changes.push("phone changed".to_string());
                member.phone = phone;
            }
        }

        if let Some(joined_on) = input.joined_on {
            if member.joined_on != Some(joined_on) {
                changes.push(format!("joined_on: {}", joined_on));
                member.joined_on = Some(joined_on);
            }
        }

        if changes.is_empty() {
            return Ok(member);
        }

        member
            .validate()
            .map_err(|e| LodgeError::Validation(e.to_string()))?;
        member.updated_at = Utc::now();

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_update(
            EntityType::Member,
            member.id.to_string(),
            Some(member.full_name.clone()),
            &before,
            &member,
            changes,
        )?;

        Ok(member)
    }

    /// Move a member on or off the active roll
    pub fn set_status(&self, id: MemberId, status: MemberStatus) -> LodgeResult<Member> {
        let mut member = self.require(id)?;
        if member.status == status {
            return Err(LodgeError::Validation(format!(
                "{} is already {}",
                member.full_name,
                status.to_string().to_lowercase()
            )));
        }

        let before = member.clone();
        member.set_status(status);

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_update(
            EntityType::Member,
            member.id.to_string(),
            Some(member.full_name.clone()),
            &before,
            &member,
            vec![format!("status: {} -> {}", before.status, member.status)],
        )?;

        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LodgePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LodgePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn named(name: &str) -> CreateMemberInput {
        CreateMemberInput {
            full_name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_member() {
        let (_temp, storage) = create_test_storage();
        let service = MemberService::new(&storage);

        let member = service
            .create(CreateMemberInput {
                full_name: "  Hiram Abif ".into(),
                dues_category: Some("honorary".into()),
                phone: Some("555-0101".into()),
                joined_on: NaiveDate::from_ymd_opt(2020, 3, 1),
            })
            .unwrap();

        assert_eq!(member.full_name, "Hiram Abif");
        assert_eq!(member.dues_category, "honorary");
        assert!(member.is_active());
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = MemberService::new(&storage);
        service.create(named("Hiram Abif")).unwrap();

        assert!(service.create(named("hiram abif")).unwrap_err().is_validation());
        assert!(service.create(named("   ")).unwrap_err().is_validation());
    }

    #[test]
    fn test_find_by_name_and_short_id() {
        let (_temp, storage) = create_test_storage();
        let service = MemberService::new(&storage);
        let member = service.create(named("Hiram Abif")).unwrap();

        assert_eq!(service.find("HIRAM ABIF").unwrap().unwrap().id, member.id);
        assert_eq!(
            service.find(&member.id.to_string()).unwrap().unwrap().id,
            member.id
        );
        assert_eq!(
            service
                .find(&member.id.as_uuid().to_string())
                .unwrap()
                .unwrap()
                .id,
            member.id
        );
        assert!(service.resolve("Solomon").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_records_changes() {
        let (_temp, storage) = create_test_storage();
        let service = MemberService::new(&storage);
        let member = service.create(named("Hiram")).unwrap();

        let updated = service
            .update(
                member.id,
                UpdateMemberInput {
                    full_name: Some("Hiram Abif".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.full_name, "Hiram Abif");

        let log = storage.audit().read_all().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].changes, vec!["full_name: Hiram -> Hiram Abif"]);
    }

    #[test]
    fn test_deactivate_and_list() {
        let (_temp, storage) = create_test_storage();
        let service = MemberService::new(&storage);
        let a = service.create(named("Adoniram")).unwrap();
        service.create(named("Boaz")).unwrap();

        service.set_status(a.id, MemberStatus::Inactive).unwrap();
        assert!(service
            .set_status(a.id, MemberStatus::Inactive)
            .unwrap_err()
            .is_validation());

        assert_eq!(service.list(false).unwrap().len(), 1);
        assert_eq!(service.list(true).unwrap().len(), 2);
    }
}
