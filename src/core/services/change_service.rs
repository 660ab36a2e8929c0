use chrono::{DateTime, Utc};

use crate::core::errors::Result;
use crate::core::models::activity_report::{MonthlyActiveUserReport, ReportWindow};
use crate::core::services::activity_replay::{assemble_report, clip_to_window, replay};
use crate::core::traits::change_log::ChangeLog;
use crate::core::traits::user_directory::UserDirectory;

/// Number of months covered by `monthly_reports` when not configured.
pub const DEFAULT_REPORT_MONTHS: u32 = 12;

/// Derives monthly active-user reports from the change log.
///
/// Every report replays the log from the beginning; nothing is cached
/// between calls.
pub struct ChangeService<L: ChangeLog, D: UserDirectory> {
    pub log: L,
    pub directory: D,
    pub tracked_permission: String,
}

impl<L: ChangeLog, D: UserDirectory> ChangeService<L, D> {
    /// Users that held the tracked permission at any point in `window`.
    pub fn report_for_window(&self, window: &ReportWindow) -> Result<MonthlyActiveUserReport> {
        let records = self.log.records_until(window.end)?;
        let outcome = replay(&records, &self.tracked_permission, window.end);
        let clipped = clip_to_window(&outcome.spans, window);

        let ids: Vec<&str> = clipped.keys().map(String::as_str).collect();
        let live_users = self.directory.find_many(&ids)?;

        let report = assemble_report(window, clipped, &live_users, &outcome.display_names);
        tracing::debug!(
            month = %window.start.format("%Y-%m"),
            active = report.active_count(),
            "monthly report built"
        );
        Ok(report)
    }

    /// Report for the calendar month `year-month`.
    pub fn report_for_month(&self, year: i32, month: u32) -> Result<MonthlyActiveUserReport> {
        self.report_for_window(&ReportWindow::for_month(year, month)?)
    }

    /// One report per calendar month, newest first, starting with the month
    /// containing `now` and going back `months` months.
    pub fn monthly_reports(
        &self,
        now: DateTime<Utc>,
        months: u32,
    ) -> Result<Vec<MonthlyActiveUserReport>> {
        let mut reports = Vec::new();
        let mut window = ReportWindow::containing(now)?;

        for _ in 0..months {
            reports.push(self.report_for_window(&window)?);
            window = window.previous()?;
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::change_log::json_change_log::JsonChangeLog;
    use crate::adapters::user_directory::json_user_directory::JsonUserDirectory;
    use crate::core::models::change_record::ChangeRecord;
    use crate::core::models::user_profile::UserProfile;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    const PERM: &str = "CanTakeExam";

    fn service(tmp: &TempDir) -> ChangeService<JsonChangeLog, JsonUserDirectory> {
        ChangeService {
            log: JsonChangeLog::new(tmp.path(), "changes.log"),
            directory: JsonUserDirectory::new(tmp.path(), "users.json"),
            tracked_permission: PERM.to_string(),
        }
    }

    fn alice() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            user_name: "alice".into(),
            display_name: "Alice".into(),
            avatar_relative_path: "/avatars/alice.png".into(),
        }
    }

    fn append_all(svc: &ChangeService<JsonChangeLog, JsonUserDirectory>, records: &[ChangeRecord]) {
        for record in records {
            svc.log.append(record).unwrap();
        }
    }

    #[test]
    fn report_uses_live_identity() {
        let tmp = TempDir::new().unwrap();
        let svc = service(&tmp);
        svc.directory.add(&alice()).unwrap();

        let base = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        append_all(
            &svc,
            &[
                ChangeRecord::user_created("u1", Some("Alice"), base - Duration::hours(1)),
                ChangeRecord::role_gained_permission("r1", PERM, base),
                ChangeRecord::user_joined_role("u1", "r1", base + Duration::days(5)),
                ChangeRecord::user_left_role("u1", "r1", base + Duration::days(10)),
            ],
        );

        let report = svc.report_for_month(2023, 1).unwrap();

        assert_eq!(report.active_count(), 1);
        let detail = &report.active_users[0];
        assert_eq!(detail.user.user_name, "alice");
        assert_eq!(detail.user.avatar_relative_path, "/avatars/alice.png");
        assert_eq!(detail.active_times[0].start, base + Duration::days(5));
        assert_eq!(detail.active_times[0].end, base + Duration::days(10));
    }

    #[test]
    fn deleted_user_still_reported_with_recorded_name() {
        let tmp = TempDir::new().unwrap();
        let svc = service(&tmp);

        let base = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        append_all(
            &svc,
            &[
                ChangeRecord::user_created("u1", Some("Alice"), base),
                ChangeRecord::role_gained_permission("r1", PERM, base),
                ChangeRecord::user_joined_role("u1", "r1", base + Duration::days(1)),
                ChangeRecord::user_deleted("u1", Some("Alice"), base + Duration::days(2)),
            ],
        );

        let report = svc.report_for_month(2023, 1).unwrap();

        assert_eq!(report.active_count(), 1);
        assert_eq!(report.active_users[0].user.display_name, "Alice");
        assert_eq!(report.active_users[0].user.user_name, "deleted");
    }

    #[test]
    fn unsorted_log_is_replayed_in_time_order() {
        let tmp = TempDir::new().unwrap();
        let svc = service(&tmp);

        let base = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        append_all(
            &svc,
            &[
                ChangeRecord::user_joined_role("u1", "r1", base + Duration::days(3)),
                ChangeRecord::role_gained_permission("r1", PERM, base),
            ],
        );

        let report = svc.report_for_month(2023, 1).unwrap();

        assert_eq!(
            report.active_users[0].active_times[0].start,
            base + Duration::days(3)
        );
    }

    #[test]
    fn monthly_reports_walk_backwards_from_now() {
        let tmp = TempDir::new().unwrap();
        let svc = service(&tmp);

        let joined = Utc.with_ymd_and_hms(2025, 11, 20, 0, 0, 0).unwrap();
        let left = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        append_all(
            &svc,
            &[
                ChangeRecord::role_gained_permission("r1", PERM, joined),
                ChangeRecord::user_joined_role("u1", "r1", joined),
                ChangeRecord::user_left_role("u1", "r1", left),
            ],
        );

        let now = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();
        let reports = svc.monthly_reports(now, 6).unwrap();

        let months: Vec<String> = reports
            .iter()
            .map(|r| r.month.format("%Y-%m").to_string())
            .collect();
        assert_eq!(
            months,
            vec!["2026-03", "2026-02", "2026-01", "2025-12", "2025-11", "2025-10"]
        );
        let counts: Vec<usize> = reports.iter().map(|r| r.active_count()).collect();
        assert_eq!(counts, vec![0, 0, 1, 1, 1, 0]);
    }

    #[test]
    fn monthly_reports_with_zero_months_is_empty() {
        let tmp = TempDir::new().unwrap();
        let svc = service(&tmp);
        assert!(svc.monthly_reports(Utc::now(), 0).unwrap().is_empty());
    }
}
