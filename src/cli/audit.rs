//! Audit log viewer

use crate::audit::EntityType;
use crate::error::{LodgeError, LodgeResult};
use crate::storage::Storage;

pub fn handle_audit_command(
    storage: &Storage,
    limit: usize,
    entity: Option<String>,
) -> LodgeResult<()> {
    let entity_type = entity
        .map(|e| {
            EntityType::parse(&e).ok_or_else(|| {
                LodgeError::Validation(format!(
                    "Unknown entity type '{}'. Use member, dues, receipt, fee or expense",
                    e
                ))
            })
        })
        .transpose()?;

    let entries = storage.audit().read_recent(limit, entity_type)?;
    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.summary_line());
    }
    Ok(())
}
