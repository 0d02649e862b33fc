//! Storage layer for lodge-dues
//!
//! JSON files with atomic writes, one repository per file, plus the audit
//! log. The payment engine only sees dues storage through [`DuesStore`].

pub mod dues;
pub mod expenses;
pub mod fees;
pub mod file_io;
pub mod members;
pub mod receipts;

pub use dues::{DuesRepository, DuesStore, EntryUpdate};
pub use expenses::ExpenseRepository;
pub use fees::FeeRepository;
pub use file_io::{read_json, write_json_atomic};
pub use members::MemberRepository;
pub use receipts::ReceiptCounterRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LodgePaths;
use crate::error::LodgeResult;

/// Owns every repository and the audit logger
pub struct Storage {
    paths: LodgePaths,
    pub members: MemberRepository,
    pub dues: DuesRepository,
    pub receipts: ReceiptCounterRepository,
    pub fees: FeeRepository,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create storage rooted at `paths`, creating directories as needed
    pub fn new(paths: LodgePaths) -> LodgeResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            members: MemberRepository::new(paths.members_file()),
            dues: DuesRepository::new(paths.dues_file()),
            receipts: ReceiptCounterRepository::new(paths.receipt_counters_file()),
            fees: FeeRepository::new(paths.fees_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &LodgePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load every repository from disk
    pub fn load_all(&self) -> LodgeResult<()> {
        self.members.load()?;
        self.dues.load()?;
        self.receipts.load()?;
        self.fees.load()?;
        self.expenses.load()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        label: Option<String>,
        entity: &T,
    ) -> LodgeResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, label, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        label: Option<String>,
        before: &T,
        after: &T,
        changes: Vec<String>,
    ) -> LodgeResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            label,
            before,
            after,
            changes,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        label: Option<String>,
        entity: &T,
    ) -> LodgeResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, label, entity))
    }
}
