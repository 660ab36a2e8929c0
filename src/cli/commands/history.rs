use chrono::{NaiveDate, TimeZone, Utc};
use colored::Colorize;

use crate::cli::commands::project::Project;
use crate::cli::output;
use crate::core::errors::{ExamTrailError, Result};
use crate::core::models::change_record::{ChangeKind, ChangeRecord};
use crate::core::traits::change_log::ChangeLog;

/// Execute the `examtrail history` command.
///
/// Displays the change log newest first, with optional filters for user,
/// date, and entry count.
pub fn execute(user: Option<&str>, since: Option<&str>, last: Option<usize>) -> Result<()> {
    let project = Project::open()?;
    let since_dt = since.map(parse_since).transpose()?;

    let records = project.change_log().read_all()?;
    let display = select(records, user, since_dt, last);

    if display.is_empty() {
        output::header("examtrail history");
        output::warning("No changes found");
        if user.is_some() || since.is_some() {
            println!("  Try removing filters to see all changes.");
        }
        return Ok(());
    }

    output::header(&format!("examtrail history ({} changes)", display.len()));
    println!();

    for record in &display {
        print_record(record);
    }

    Ok(())
}

/// Filter and order records for display: newest first, ties keep the
/// reverse of storage order, at most `last` records.
fn select(
    records: Vec<ChangeRecord>,
    user: Option<&str>,
    since: Option<chrono::DateTime<Utc>>,
    last: Option<usize>,
) -> Vec<ChangeRecord> {
    let mut selected: Vec<ChangeRecord> = records
        .into_iter()
        .filter(|r| user.is_none_or(|u| r.involves_user(u)))
        .filter(|r| since.is_none_or(|s| r.occurred_at >= s))
        .collect();

    selected.reverse();
    selected.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

    if let Some(n) = last {
        selected.truncate(n);
    }
    selected
}

/// Parse a date string (ISO 8601: `YYYY-MM-DD`) into a UTC DateTime.
fn parse_since(s: &str) -> Result<chrono::DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ExamTrailError::InvalidConfig {
            detail: format!(
                "Invalid date format: '{s}'. Expected ISO 8601 (YYYY-MM-DD), e.g. 2026-01-15"
            ),
        })
        .map(|d| Utc.from_utc_datetime(&d.and_time(chrono::NaiveTime::MIN)))
}

/// Print a single change as a formatted row.
fn print_record(record: &ChangeRecord) {
    let date = record.occurred_at.format("%Y-%m-%d %H:%M:%S");
    let actor = record
        .trigger_user_id
        .as_deref()
        .unwrap_or("system")
        .dimmed()
        .to_string();

    println!(
        "  {} {} {} {} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        format_kind(record.kind),
        record.details,
        actor,
    );
}

/// Format a ChangeKind as a colored label.
fn format_kind(kind: ChangeKind) -> String {
    let label = format!("{kind:<12}");
    match kind {
        ChangeKind::UserCreated => label.cyan().to_string(),
        ChangeKind::UserDeleted => label.red().to_string(),
        ChangeKind::UserJoinedRole => label.green().to_string(),
        ChangeKind::UserLeftRole => label.yellow().to_string(),
        ChangeKind::RoleGainedPermission => label.green().to_string(),
        ChangeKind::RoleLostPermission => label.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, 10, 0, 0).unwrap()
    }

    fn sample() -> Vec<ChangeRecord> {
        vec![
            ChangeRecord::user_created("u1", None, t(1)).triggered_by(Some("admin")),
            ChangeRecord::user_created("u2", None, t(2)),
            ChangeRecord::user_joined_role("u1", "r1", t(3)),
            ChangeRecord::user_left_role("u1", "r1", t(3)),
        ]
    }

    #[test]
    fn newest_first_with_ties_reversed() {
        let out = select(sample(), None, None, None);
        let kinds: Vec<ChangeKind> = out.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::UserLeftRole,
                ChangeKind::UserJoinedRole,
                ChangeKind::UserCreated,
                ChangeKind::UserCreated,
            ]
        );
    }

    #[test]
    fn filter_by_user_matches_trigger() {
        assert_eq!(select(sample(), Some("admin"), None, None).len(), 1);
        assert_eq!(select(sample(), Some("u1"), None, None).len(), 3);
    }

    #[test]
    fn filter_since_and_last() {
        let out = select(sample(), None, Some(t(2)), Some(2));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.occurred_at == t(3)));
    }

    #[test]
    fn since_parses_iso_date() {
        assert_eq!(
            parse_since("2026-05-02").unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap()
        );
        assert!(parse_since("05/02/2026").is_err());
    }
}
