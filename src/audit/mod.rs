//! Audit trail for the treasury
//!
//! Every create, update and delete of members, dues entries and receipt
//! counters is appended to `audit.log` as a JSON line with before/after
//! snapshots. Bulk payments log one record per written entry.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
