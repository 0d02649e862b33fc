//! Audit record format
//!
//! One record per create, update or delete of an audited record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        };
        f.write_str(label)
    }
}

/// Kinds of records the treasury audits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Member,
    DuesEntry,
    ReceiptCounter,
    Fee,
    Expense,
}

impl EntityType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "member" | "members" => Some(Self::Member),
            "dues" | "dues_entry" | "entry" => Some(Self::DuesEntry),
            "receipt" | "receipt_counter" => Some(Self::ReceiptCounter),
            "fee" | "fees" => Some(Self::Fee),
            "expense" | "expenses" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityType::Member => "Member",
            EntityType::DuesEntry => "DuesEntry",
            EntityType::ReceiptCounter => "ReceiptCounter",
            EntityType::Fee => "Fee",
            EntityType::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// A single line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Label shown next to the id (member name, "2025-09 Hiram Abif", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Field-level summary of an update
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        label: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            label,
            before: None,
            after: None,
            changes: Vec::new(),
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        label: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Create, entity_type, entity_id.into(), label);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        label: Option<String>,
        before: &T,
        after: &T,
        changes: Vec<String>,
    ) -> Self {
        let mut entry = Self::new(Operation::Update, entity_type, entity_id.into(), label);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry.changes = changes;
        entry
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        label: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Delete, entity_type, entity_id.into(), label);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    /// One-line rendering for `lodge audit`
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "[{}] {:<6} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.entity_type,
            self.entity_id
        );
        if let Some(label) = &self.label {
            line.push_str(&format!(" ({})", label));
        }
        if !self.changes.is_empty() {
            line.push_str(&format!("\n    {}", self.changes.join("; ")));
        }
        line
    }
}
