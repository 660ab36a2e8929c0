//! Replay of the change log into per-user permission spans, and assembly of
//! those spans into a monthly report.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::core::models::activity_report::{
    ActiveSpan, ActiveUserDetail, ActiveUserInfo, MonthlyActiveUserReport, ReportWindow,
};
use crate::core::models::change_record::ChangeRecord;
use crate::core::models::user_profile::UserProfile;
use crate::core::services::permission_state::PermissionState;
use crate::core::services::span_tracker::SpanTracker;

/// Result of replaying the log up to a cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Every span per user, including spans that ended before any window.
    pub spans: BTreeMap<String, Vec<ActiveSpan>>,
    /// Last display name recorded for each user.
    pub display_names: HashMap<String, String>,
}

/// Replay `records` (ordered by time, ties in storage order) and track when
/// each user held `permission`. Records after `end` are ignored and spans
/// still open at the last record are closed at `end`.
///
/// After each record the targeted user is re-checked; for role permission
/// changes every current member of the role is re-checked as well.
pub fn replay(records: &[ChangeRecord], permission: &str, end: DateTime<Utc>) -> ReplayOutcome {
    let mut state = PermissionState::new();
    let mut tracker = SpanTracker::new();
    let mut applied = 0usize;

    for record in records.iter().filter(|r| r.occurred_at <= end) {
        state.apply(record);
        applied += 1;

        let mut recheck: BTreeSet<&str> = BTreeSet::new();
        if let Some(user_id) = record.target_user_id.as_deref() {
            recheck.insert(user_id);
        }
        if record.kind.is_role_permission_change()
            && let Some(role_id) = record.target_role_id.as_deref()
        {
            recheck.extend(state.members_of(role_id));
        }

        for user_id in recheck {
            tracker.observe(user_id, state.holds(user_id, permission), record.occurred_at);
        }
    }

    tracing::debug!(applied, permission, cutoff = %end, "change log replayed");

    ReplayOutcome {
        spans: tracker.finish(end),
        display_names: state.into_display_names(),
    }
}

/// Clip every span to `window`, dropping spans without overlap and users
/// left with no spans.
pub fn clip_to_window(
    spans: &BTreeMap<String, Vec<ActiveSpan>>,
    window: &ReportWindow,
) -> BTreeMap<String, Vec<ActiveSpan>> {
    spans
        .iter()
        .filter_map(|(user_id, user_spans)| {
            let clipped: Vec<ActiveSpan> =
                user_spans.iter().filter_map(|s| window.clip(s)).collect();
            (!clipped.is_empty()).then(|| (user_id.clone(), clipped))
        })
        .collect()
}

/// Build the report for `window` from clipped spans.
///
/// Users found in `live_users` are shown with their current identity; the
/// rest fall back to the last display name seen in the log. Users are
/// ordered by the start of their first span, then by id.
pub fn assemble_report(
    window: &ReportWindow,
    clipped: BTreeMap<String, Vec<ActiveSpan>>,
    live_users: &HashMap<String, UserProfile>,
    display_names: &HashMap<String, String>,
) -> MonthlyActiveUserReport {
    let mut active_users: Vec<ActiveUserDetail> = clipped
        .into_iter()
        .map(|(user_id, active_times)| {
            let user = match live_users.get(&user_id) {
                Some(profile) => ActiveUserInfo::live(profile),
                None => ActiveUserInfo::removed(
                    &user_id,
                    display_names.get(&user_id).map(String::as_str),
                ),
            };
            ActiveUserDetail { user, active_times }
        })
        .collect();

    active_users.sort_by(|a, b| {
        let first = |d: &ActiveUserDetail| d.active_times.first().map(|s| s.start);
        first(a).cmp(&first(b)).then_with(|| a.user.id.cmp(&b.user.id))
    });

    MonthlyActiveUserReport {
        month: window.start,
        active_users,
    }
}
