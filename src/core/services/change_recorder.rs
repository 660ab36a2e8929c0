use chrono::Utc;

use crate::core::errors::Result;
use crate::core::models::change_record::ChangeRecord;
use crate::core::traits::change_log::ChangeLog;

/// Stamps and appends change records through a `ChangeLog` backend.
pub struct ChangeRecorder<L: ChangeLog> {
    pub log: L,
    /// Id of the user performing the changes, if known.
    pub trigger_user_id: Option<String>,
}

impl<L: ChangeLog> ChangeRecorder<L> {
    /// Build a record stamped with the current time via `make`, attach the
    /// trigger user and `details`, and append it.
    pub fn record(
        &self,
        make: impl FnOnce(chrono::DateTime<Utc>) -> ChangeRecord,
        details: &str,
    ) -> Result<ChangeRecord> {
        let record = make(Utc::now())
            .triggered_by(self.trigger_user_id.as_deref())
            .with_details(details);
        self.log.append(&record)?;
        tracing::info!(kind = %record.kind, details = %record.details, "change recorded");
        Ok(record)
    }
}
