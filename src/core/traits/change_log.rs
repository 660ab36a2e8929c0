use chrono::{DateTime, Utc};

use crate::core::errors::Result;
use crate::core::models::change_record::ChangeRecord;

/// Port for the append-only change log.
pub trait ChangeLog: Send + Sync {
    /// Append a record. Existing records are never rewritten.
    fn append(&self, record: &ChangeRecord) -> Result<()>;

    /// Every record, in storage order.
    fn read_all(&self) -> Result<Vec<ChangeRecord>>;

    /// Records that occurred at or before `cutoff`, ordered by time.
    /// Records sharing a timestamp keep their storage order.
    fn records_until(&self, cutoff: DateTime<Utc>) -> Result<Vec<ChangeRecord>> {
        let mut records: Vec<ChangeRecord> = self
            .read_all()?
            .into_iter()
            .filter(|r| r.occurred_at <= cutoff)
            .collect();
        // stable: ties stay in storage order
        records.sort_by_key(|r| r.occurred_at);
        Ok(records)
    }
}
