use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::cli::commands::project::Project;
use crate::cli::{context, output};
use crate::core::errors::{ExamTrailError, Result};
use crate::core::models::activity_report::{ActiveSpan, MonthlyActiveUserReport};

/// Execute the `examtrail active-users` command.
///
/// Prints the number of users holding the tracked permission in each of
/// the last N months, newest first.
pub fn execute(months: Option<u32>) -> Result<()> {
    let project = Project::open()?;
    let months = months.unwrap_or(project.config.reports.default_months);
    let permission = project.config.examtrail.tracked_permission.clone();

    let reports = project.change_service().monthly_reports(Utc::now(), months)?;

    output::header(&format!(
        "Active users with {permission} (last {months} months)"
    ));
    println!();

    for report in &reports {
        let count = report.active_count();
        let label = if count == 1 { "user" } else { "users" };
        let count_display = if count == 0 {
            format!("{count} {label}").dimmed().to_string()
        } else {
            format!("{count} {label}").green().to_string()
        };
        println!(
            "  {} {} {}",
            report.month.format("%Y-%m").to_string().cyan(),
            "│".dimmed(),
            count_display
        );
    }

    Ok(())
}

/// Execute the `examtrail active-users-details` command.
///
/// Prints every active user of one month with the times they held the
/// tracked permission, as a table or as JSON.
pub fn execute_details(month: &str, json: bool) -> Result<()> {
    let (year, month_num) = context::parse_month(month)?;
    let project = Project::open()?;
    let report = project.change_service().report_for_month(year, month_num)?;

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|e| {
            ExamTrailError::ReportRenderError {
                detail: e.to_string(),
            }
        })?;
        println!("{out}");
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &MonthlyActiveUserReport) {
    let month = report.month.format("%Y-%m");

    if report.active_users.is_empty() {
        output::header(&format!("Active users — {month}"));
        output::warning("No active users this month");
        return;
    }

    output::header(&format!(
        "Active users — {month} ({} users)",
        report.active_count()
    ));

    for detail in &report.active_users {
        let user = &detail.user;
        println!();
        println!(
            "  {} {} {}",
            user.display_name.bold(),
            format!("@{}", user.user_name).dimmed(),
            user.id.dimmed()
        );
        for span in &detail.active_times {
            println!("    {}", format_span(span));
        }
    }
}

fn format_span(span: &ActiveSpan) -> String {
    format!("{} → {}", format_instant(span.start), format_instant(span.end))
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn span_formatting() {
        let span = ActiveSpan {
            start: Utc.with_ymd_and_hms(2026, 1, 3, 8, 5, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 1, 10, 17, 30, 0).unwrap(),
        };
        assert_eq!(format_span(&span), "2026-01-03 08:05 → 2026-01-10 17:30");
    }
}
