//! Strongly-typed ID wrappers for ledger entities
//!
//! Members, dues entries, bulk-payment groups, fees and expenses all use
//! UUIDs; the newtypes
//! keep a member id from ever being passed where an entry id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a full UUID string or a prefixed UUID
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                s.parse()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(MemberId, "mem-");
define_id!(DuesEntryId, "due-");
define_id!(PaymentGroupId, "grp-");
define_id!(FeeRecordId, "fee-");
define_id!(ExpenseId, "exp-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_prefix() {
        let id = MemberId::new();
        let display = id.to_string();
        assert!(display.starts_with("mem-"));
        assert_eq!(display.len(), 12);

        assert!(PaymentGroupId::new().to_string().starts_with("grp-"));
        assert!(FeeRecordId::new().to_string().starts_with("fee-"));
        assert!(ExpenseId::new().to_string().starts_with("exp-"));
    }

    #[test]
    fn test_parse_full_and_prefixed() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let plain = DuesEntryId::parse(uuid_str).unwrap();
        let prefixed = DuesEntryId::parse(&format!("due-{}", uuid_str)).unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_short_display_is_not_parseable() {
        let id = MemberId::new();
        assert!(MemberId::parse(&id.to_string()).is_err());
    }

    #[test]
    fn test_id_serialization() {
        let id = PaymentGroupId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: PaymentGroupId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
