use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::config::app_config::StorageSection;
use crate::core::errors::{ExamTrailError, Result};
use crate::core::models::change_record::ChangeRecord;
use crate::core::traits::change_log::ChangeLog;

/// Change log that appends records as JSON lines to a file.
///
/// Each line in the log file is a self-contained JSON object representing
/// one `ChangeRecord`. Lines are only ever appended, so storage order is
/// insertion order.
pub struct JsonChangeLog {
    log_path: PathBuf,
}

impl JsonChangeLog {
    /// Create a change log stored at `{examtrail_dir}/{log_file}`.
    pub fn new(examtrail_dir: &Path, log_file: &str) -> Self {
        Self {
            log_path: examtrail_dir.join(log_file),
        }
    }

    /// Create a change log from the `[storage]` section.
    pub fn from_config(examtrail_dir: &Path, storage: &StorageSection) -> Self {
        Self::new(examtrail_dir, &storage.change_log)
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

impl ChangeLog for JsonChangeLog {
    fn append(&self, record: &ChangeRecord) -> Result<()> {
        let line = serde_json::to_string(record).map_err(|e| ExamTrailError::ChangeLogError {
            detail: format!("Failed to serialize change record: {e}"),
        })?;

        if let Some(parent) = self.log_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| ExamTrailError::ChangeLogError {
                detail: format!("Cannot open change log at {}: {e}", self.log_path.display()),
            })?;

        writeln!(file, "{line}").map_err(|e| ExamTrailError::ChangeLogError {
            detail: format!("Failed to write change record: {e}"),
        })?;

        Ok(())
    }

    fn read_all(&self) -> Result<Vec<ChangeRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.log_path).map_err(|e| ExamTrailError::ChangeLogError {
            detail: format!("Cannot read change log: {e}"),
        })?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| ExamTrailError::ChangeLogError {
                detail: format!("Error reading change log line {}: {e}", line_num + 1),
            })?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record: ChangeRecord =
                serde_json::from_str(trimmed).map_err(|e| ExamTrailError::ChangeLogError {
                    detail: format!("Malformed change record at line {}: {e}", line_num + 1),
                })?;
            records.push(record);
        }

        tracing::debug!(
            path = %self.log_path.display(),
            count = records.len(),
            "change log loaded"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn append_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let log = JsonChangeLog::new(tmp.path(), "changes.log");

        let record = ChangeRecord::user_created("u1", Some("Alice"), Utc::now())
            .with_details("User 'alice' was created.");
        log.append(&record).unwrap();

        assert_eq!(log.read_all().unwrap(), vec![record]);
    }

    #[test]
    fn read_missing_file_is_empty() {
        let log = JsonChangeLog::new(Path::new("/nonexistent"), "changes.log");
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let log = JsonChangeLog::new(tmp.path(), "changes.log");
        log.append(&ChangeRecord::user_created("u1", None, Utc::now()))
            .unwrap();
        let mut content = fs::read_to_string(log.path()).unwrap();
        content.push_str("\n\n");
        fs::write(log.path(), content).unwrap();

        assert_eq!(log.read_all().unwrap().len(), 1);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let tmp = TempDir::new().unwrap();
        let log = JsonChangeLog::new(tmp.path(), "changes.log");
        log.append(&ChangeRecord::user_created("u1", None, Utc::now()))
            .unwrap();
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "{{not json").unwrap();

        let err = log.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn records_until_filters_and_orders_by_time() {
        let tmp = TempDir::new().unwrap();
        let log = JsonChangeLog::new(tmp.path(), "changes.log");
        let t = |d| Utc.with_ymd_and_hms(2026, 2, d, 0, 0, 0).unwrap();

        log.append(&ChangeRecord::user_joined_role("u1", "r1", t(5)))
            .unwrap();
        log.append(&ChangeRecord::user_created("u1", None, t(1)))
            .unwrap();
        log.append(&ChangeRecord::user_left_role("u1", "r1", t(5)))
            .unwrap();
        log.append(&ChangeRecord::user_deleted("u1", None, t(9)))
            .unwrap();

        let records = log.records_until(t(5)).unwrap();
        let kinds: Vec<_> = records.iter().map(|r| r.kind).collect();
        use crate::core::models::change_record::ChangeKind::*;
        assert_eq!(kinds, vec![UserCreated, UserJoinedRole, UserLeftRole]);
    }

    #[test]
    fn creates_missing_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let log = JsonChangeLog::new(&tmp.path().join("nested"), "changes.log");
        log.append(&ChangeRecord::user_created("u1", None, Utc::now()))
            .unwrap();
        assert!(log.path().exists());
    }
}
