use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::core::errors::{ExamTrailError, Result};
use crate::core::models::user_profile::{DEFAULT_AVATAR_PATH, UserProfile};

/// Display name reported for a removed user whose name was never recorded.
pub const DELETED_DISPLAY_NAME: &str = "Deleted User";

/// User name reported for a removed user.
pub const DELETED_USER_NAME: &str = "deleted";

/// An interval during which a user held the tracked permission.
///
/// Spans produced by replay are half-open `[start, end)`; once clipped to a
/// report window both ends lie inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Inclusive reporting period `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// The calendar month `year-month`, ending one tick (100ns) before the
    /// next month starts.
    pub fn for_month(year: i32, month: u32) -> Result<Self> {
        let start = month_start(year, month)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = month_start(next_year, next_month)? - Duration::nanoseconds(100);
        Ok(Self { start, end })
    }

    /// The calendar month containing `instant`.
    pub fn containing(instant: DateTime<Utc>) -> Result<Self> {
        Self::for_month(instant.year(), instant.month())
    }

    /// The calendar month before this one.
    pub fn previous(&self) -> Result<Self> {
        let (year, month) = (self.start.year(), self.start.month());
        if month == 1 {
            Self::for_month(year - 1, 12)
        } else {
            Self::for_month(year, month - 1)
        }
    }

    /// Intersect `span` with this window. Returns `None` when they do not
    /// overlap; a span touching the window at one instant yields a
    /// zero-length span.
    pub fn clip(&self, span: &ActiveSpan) -> Option<ActiveSpan> {
        let start = span.start.max(self.start);
        let end = span.end.min(self.end);
        (start <= end).then_some(ActiveSpan { start, end })
    }
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ExamTrailError::InvalidMonth {
            value: format!("{year:04}-{month:02}"),
        }
    })?;
    Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

/// Identity shown for a user in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveUserInfo {
    pub id: String,
    pub user_name: String,
    pub display_name: String,
    pub avatar_relative_path: String,
}

impl ActiveUserInfo {
    /// Identity of a user that still exists.
    pub fn live(user: &UserProfile) -> Self {
        Self {
            id: user.id.clone(),
            user_name: user.user_name.clone(),
            display_name: user.display_name.clone(),
            avatar_relative_path: user.avatar_relative_path.clone(),
        }
    }

    /// Identity of a user that no longer exists, using the last display
    /// name seen in the change log.
    pub fn removed(user_id: &str, last_display_name: Option<&str>) -> Self {
        Self {
            id: user_id.to_string(),
            user_name: DELETED_USER_NAME.to_string(),
            display_name: last_display_name
                .unwrap_or(DELETED_DISPLAY_NAME)
                .to_string(),
            avatar_relative_path: DEFAULT_AVATAR_PATH.to_string(),
        }
    }
}

/// One user in a monthly report with the spans they were active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveUserDetail {
    pub user: ActiveUserInfo,
    pub active_times: Vec<ActiveSpan>,
}

/// Users that held the tracked permission at any point in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyActiveUserReport {
    pub month: DateTime<Utc>,
    pub active_users: Vec<ActiveUserDetail>,
}

impl MonthlyActiveUserReport {
    pub fn active_count(&self) -> usize {
        self.active_users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn month_window_ends_one_tick_before_next_month() {
        let window = ReportWindow::for_month(2023, 1).unwrap();
        assert_eq!(window.start, utc(2023, 1, 1, 0));
        assert_eq!(
            window.end.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true),
            "2023-01-31T23:59:59.999999900Z"
        );
    }

    #[test]
    fn december_rolls_into_next_year() {
        let window = ReportWindow::for_month(2025, 12).unwrap();
        assert_eq!(window.end + Duration::nanoseconds(100), utc(2026, 1, 1, 0));
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(matches!(
            ReportWindow::for_month(2025, 13),
            Err(ExamTrailError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn previous_crosses_year_boundary() {
        let window = ReportWindow::for_month(2026, 1).unwrap();
        assert_eq!(window.previous().unwrap().start, utc(2025, 12, 1, 0));
    }

    #[test]
    fn containing_picks_calendar_month() {
        let window = ReportWindow::containing(utc(2024, 2, 29, 13)).unwrap();
        assert_eq!(window.start, utc(2024, 2, 1, 0));
        assert_eq!(window.end + Duration::nanoseconds(100), utc(2024, 3, 1, 0));
    }

    #[test]
    fn clip_trims_both_ends() {
        let window = ReportWindow::for_month(2023, 1).unwrap();
        let span = ActiveSpan {
            start: utc(2022, 12, 20, 0),
            end: utc(2023, 2, 3, 0),
        };
        assert_eq!(
            window.clip(&span),
            Some(ActiveSpan {
                start: window.start,
                end: window.end
            })
        );
    }

    #[test]
    fn clip_outside_window_is_none() {
        let window = ReportWindow::for_month(2023, 1).unwrap();
        let before = ActiveSpan {
            start: utc(2022, 12, 1, 0),
            end: utc(2022, 12, 31, 0),
        };
        let after = ActiveSpan {
            start: utc(2023, 2, 1, 0),
            end: utc(2023, 2, 2, 0),
        };
        assert_eq!(window.clip(&before), None);
        assert_eq!(window.clip(&after), None);
    }

    #[test]
    fn clip_touching_window_start_is_zero_length() {
        let window = ReportWindow::for_month(2023, 1).unwrap();
        let span = ActiveSpan {
            start: utc(2022, 12, 1, 0),
            end: window.start,
        };
        assert_eq!(
            window.clip(&span),
            Some(ActiveSpan {
                start: window.start,
                end: window.start
            })
        );
    }

    #[test]
    fn removed_user_falls_back_to_placeholders() {
        let info = ActiveUserInfo::removed("u9", None);
        assert_eq!(info.display_name, DELETED_DISPLAY_NAME);
        assert_eq!(info.user_name, DELETED_USER_NAME);
        assert_eq!(info.avatar_relative_path, DEFAULT_AVATAR_PATH);

        let named = ActiveUserInfo::removed("u9", Some("Old Name"));
        assert_eq!(named.display_name, "Old Name");
    }
}
