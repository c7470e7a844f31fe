//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{MonetaError, MonetaResult};

use super::entry::AuditEntry;

/// Writes audit entries, one JSON object per line, to `audit.log`
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry and flush it to disk
    pub fn log(&self, entry: &AuditEntry) -> MonetaResult<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| MonetaError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| MonetaError::Io(format!("Failed to open audit log: {}", e)))?;

        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| MonetaError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Read every entry, oldest first
    ///
    /// Lines that fail to parse are skipped with a warning so one damaged
    /// line does not hide the rest of the history.
    pub fn read_all(&self) -> MonetaResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| MonetaError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                MonetaError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(line = index + 1, error = %e, "skipping malformed audit entry"),
            }
        }

        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> MonetaResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Number of non-empty lines in the log
    pub fn entry_count(&self) -> MonetaResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| MonetaError::Io(format!("Failed to open audit log: {}", e)))?;

        Ok(BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn category_entry(id: usize) -> AuditEntry {
        AuditEntry::create(
            EntityType::Category,
            format!("cat-{}", id),
            Some(format!("Category {}", id)),
            &json!({"index": id}),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&category_entry(1)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Category);
        assert_eq!(logger.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_read_recent_keeps_order() {
        let (logger, _temp) = create_test_logger();
        for i in 0..10 {
            logger.log(&category_entry(i)).unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        let ids: Vec<_> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, ["cat-7", "cat-8", "cat-9"]);

        assert_eq!(logger.read_recent(50).unwrap().len(), 10);
    }

    #[test]
    fn test_missing_log_is_empty() {
        let (logger, _temp) = create_test_logger();
        assert_eq!(logger.entry_count().unwrap(), 0);
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let (logger, _temp) = create_test_logger();
        logger.log(&category_entry(1)).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(logger.path())
            .unwrap()
            .write_all(b"{not json\n")
            .unwrap();
        logger.log(&category_entry(2)).unwrap();

        assert_eq!(logger.read_all().unwrap().len(), 2);
        assert_eq!(logger.entry_count().unwrap(), 3);
    }

    #[test]
    fn test_reopened_logger_sees_history() {
        let (logger, temp) = create_test_logger();
        logger.log(&category_entry(1)).unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}
