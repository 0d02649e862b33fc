//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{LodgeError, LodgeResult};

use super::entry::{AuditEntry, EntityType};

/// Writes and reads the audit log, one JSON object per line
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Append one record and flush
    pub fn log(&self, entry: &AuditEntry) -> LodgeResult<()> {
        self.append(std::slice::from_ref(entry))
    }

    /// Append several records with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> LodgeResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        self.append(entries)
    }

    fn append(&self, entries: &[AuditEntry]) -> LodgeResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LodgeError::Io(format!("Failed to open audit log: {}", e)))?;

        for entry in entries {
            let line = serde_json::to_string(entry)?;
            writeln!(file, "{}", line)
                .map_err(|e| LodgeError::Io(format!("Failed to write audit log: {}", e)))?;
        }

        file.flush()
            .map_err(|e| LodgeError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// Every record, oldest first
    pub fn read_all(&self) -> LodgeResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LodgeError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                LodgeError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                LodgeError::Json(format!("Bad audit record at line {}: {}", index + 1, e))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The newest `count` records, optionally restricted to one entity type
    pub fn read_recent(
        &self,
        count: usize,
        entity_type: Option<EntityType>,
    ) -> LodgeResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        if let Some(kind) = entity_type {
            entries.retain(|e| e.entity_type == kind);
        }
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Records touching a single entity id
    pub fn history_of(&self, entity_id: &str) -> LodgeResult<Vec<AuditEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.entity_id == entity_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn member_created(id: &str) -> AuditEntry {
        AuditEntry::create(EntityType::Member, id, None, &json!({"id": id}))
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (logger, _temp) = logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(5, None).unwrap().is_empty());
    }

    #[test]
    fn test_log_appends_in_order() {
        let (logger, _temp) = logger();
        logger.log(&member_created("mem-a")).unwrap();
        logger.log(&member_created("mem-b")).unwrap();

        let ids: Vec<_> = logger
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.entity_id)
            .collect();
        assert_eq!(ids, vec!["mem-a", "mem-b"]);
    }

    #[test]
    fn test_read_recent_filters_by_type() {
        let (logger, _temp) = logger();
        let batch = vec![
            member_created("mem-a"),
            AuditEntry::create(EntityType::DuesEntry, "due-a", None, &json!({})),
            member_created("mem-b"),
            AuditEntry::create(EntityType::DuesEntry, "due-b", None, &json!({})),
        ];
        logger.log_batch(&batch).unwrap();

        let dues = logger.read_recent(10, Some(EntityType::DuesEntry)).unwrap();
        assert_eq!(dues.len(), 2);

        let last = logger.read_recent(1, None).unwrap();
        assert_eq!(last[0].entity_id, "due-b");
    }

    #[test]
    fn test_history_of_entity() {
        let (logger, temp) = logger();
        logger.log(&member_created("mem-a")).unwrap();
        logger
            .log(&AuditEntry::delete(EntityType::Member, "mem-a", None, &json!({})))
            .unwrap();
        logger.log(&member_created("mem-b")).unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        let history = reopened.history_of("mem-a").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].operation, Operation::Delete);
    }

    #[test]
    fn test_corrupt_line_is_reported() {
        let (logger, _temp) = logger();
        logger.log(&member_created("mem-a")).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(logger.path())
            .and_then(|mut f| writeln!(f, "not json"))
            .unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
