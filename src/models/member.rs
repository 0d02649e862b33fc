//! Member model
//!
//! A member of the lodge. Dues allocation only ever needs the member's id;
//! the rest is roll-keeping.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::MemberId;

/// Whether a member is currently on the active roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
}

impl MemberStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

/// A lodge member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,

    /// Full name as printed on receipts
    pub full_name: String,

    /// Monthly-dues category (e.g., "regular", "honorary"); a label only
    #[serde(default = "default_category")]
    pub dues_category: String,

    #[serde(default)]
    pub status: MemberStatus,

    /// Contact phone, used by the receipt delivery collaborator
    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub joined_on: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    "regular".to_string()
}

impl Member {
    /// Create a new active member in the regular dues category
    pub fn new(full_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: MemberId::new(),
            full_name: full_name.into(),
            dues_category: default_category(),
            status: MemberStatus::Active,
            phone: None,
            joined_on: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn set_status(&mut self, status: MemberStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Validate the member
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        let name = self.full_name.trim();
        if name.is_empty() {
            return Err(MemberValidationError::EmptyName);
        }
        if name.len() > 120 {
            return Err(MemberValidationError::NameTooLong(name.len()));
        }
        if self.dues_category.trim().is_empty() {
            return Err(MemberValidationError::EmptyCategory);
        }
        Ok(())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

/// Validation errors for members
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    EmptyName,
    NameTooLong(usize),
    EmptyCategory,
}

impl fmt::Display for MemberValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Member name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Member name too long ({} chars, max 120)", len)
            }
            Self::EmptyCategory => write!(f, "Dues category cannot be empty"),
        }
    }
}

impl std::error::Error for MemberValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_member() {
        let member = Member::new("Hiram Abif");
        assert_eq!(member.full_name, "Hiram Abif");
        assert_eq!(member.dues_category, "regular");
        assert!(member.is_active());
        assert!(member.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut member = Member::new("   ");
        assert_eq!(member.validate(), Err(MemberValidationError::EmptyName));

        member.full_name = "a".repeat(121);
        assert!(matches!(
            member.validate(),
            Err(MemberValidationError::NameTooLong(121))
        ));

        member.full_name = "Valid".into();
        member.dues_category = String::new();
        assert_eq!(member.validate(), Err(MemberValidationError::EmptyCategory));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(MemberStatus::parse("Inactive"), Some(MemberStatus::Inactive));
        assert_eq!(MemberStatus::parse("gone"), None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "full_name": "Old Record",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.dues_category, "regular");
        assert_eq!(member.status, MemberStatus::Active);
        assert!(member.phone.is_none());
    }
}
