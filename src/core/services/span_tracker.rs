use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::core::models::activity_report::ActiveSpan;

/// Per-user open/closed span bookkeeping.
///
/// A user is `Inactive` (no open span) or `Active` (open span since some
/// instant). `observe` moves between the two; `finish` closes whatever is
/// still open.
#[derive(Debug, Default)]
pub struct SpanTracker {
    open: HashMap<String, DateTime<Utc>>,
    closed: BTreeMap<String, Vec<ActiveSpan>>,
}

impl SpanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whether `user_id` holds the permission as of `at`.
    pub fn observe(&mut self, user_id: &str, active_now: bool, at: DateTime<Utc>) {
        match (active_now, self.is_active(user_id)) {
            (true, false) => {
                self.open.insert(user_id.to_string(), at);
            }
            (false, true) => {
                if let Some(start) = self.open.remove(user_id) {
                    self.closed
                        .entry(user_id.to_string())
                        .or_default()
                        .push(ActiveSpan { start, end: at });
                }
            }
            _ => {}
        }
    }

    /// Whether `user_id` currently has an open span.
    pub fn is_active(&self, user_id: &str) -> bool {
        self.open.contains_key(user_id)
    }

    /// Close every open span at `end` and return all spans per user, each
    /// user's spans in chronological order.
    pub fn finish(mut self, end: DateTime<Utc>) -> BTreeMap<String, Vec<ActiveSpan>> {
        for (user_id, start) in self.open.drain() {
            self.closed
                .entry(user_id)
                .or_default()
                .push(ActiveSpan { start, end });
        }
        for spans in self.closed.values_mut() {
            spans.sort_by_key(|s| s.start);
        }
        self.closed
    }
}
