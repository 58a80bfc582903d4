//! Weekly aggregation: turning an owner's flat entry list into the
//! per-week bundle views the dashboards render.

use itertools::Itertools;
use serde::Serialize;
use strum::Display;
use time::Date;

use super::category::{EntryState, WeekTag};
use super::models::LogEntry;

/// Aggregate lifecycle state of one week's bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BundleState {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

/// Week number an entry is bundled into, if it carries a recognized tag.
pub fn entry_week(entry: &LogEntry) -> Option<u32> {
    entry
        .category
        .as_deref()
        .and_then(WeekTag::decode)
        .map(|tag| tag.week)
}

/// Distinct week numbers that have at least one tagged entry, ascending.
pub fn tagged_weeks(entries: &[LogEntry]) -> Vec<u32> {
    entries
        .iter()
        .filter_map(entry_week)
        .sorted_unstable()
        .dedup()
        .collect()
}

/// Read-time state of a set of entries sharing one week.
///
/// A bundle with mixed tags (possible after a partially failed retag, or
/// after racing mentor decisions) is resolved by fixed precedence:
/// approved > rejected > submitted > draft. Re-running the intended
/// transition rewrites every member and converges the mixture.
pub fn aggregate_state(entries: &[LogEntry]) -> BundleState {
    let mut state = BundleState::Draft;
    for entry in entries {
        let Some(tag) = entry.category.as_deref().and_then(WeekTag::decode) else {
            continue;
        };
        match tag.state {
            EntryState::Approved => return BundleState::Approved,
            EntryState::Rejected => state = BundleState::Rejected,
            EntryState::Submitted => {
                if state == BundleState::Draft {
                    state = BundleState::Submitted;
                }
            }
        }
    }
    state
}

/// The assembled view of one intern-week: member entries sorted by date,
/// the covered date range, and the aggregate state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBundle {
    pub week: u32,
    pub state: BundleState,
    pub entry_count: usize,
    pub first_date: Option<Date>,
    pub last_date: Option<Date>,
    pub entries: Vec<LogEntry>,
}

impl WeeklyBundle {
    pub fn assemble(week: u32, entries: Vec<LogEntry>) -> Self {
        let mut members: Vec<LogEntry> = entries
            .into_iter()
            .filter(|entry| entry_week(entry) == Some(week))
            .collect();
        members.sort_by_key(|entry| entry.entry_date);

        let state = aggregate_state(&members);
        let first_date = members.first().map(|entry| entry.entry_date);
        let last_date = members.last().map(|entry| entry.entry_date);

        Self {
            week,
            state,
            entry_count: members.len(),
            first_date,
            last_date,
            entries: members,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn entry(id: i32, day: Date, category: Option<&str>) -> LogEntry {
        LogEntry {
            id,
            user_id: 1,
            project_id: None,
            task_id: None,
            entry_date: day,
            start_time: None,
            end_time: None,
            duration_minutes: 60,
            content: format!("entry {id}"),
            category: category.map(str::to_string),
            attachments: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn tagged_weeks_are_distinct_and_sorted() {
        let entries = vec![
            entry(1, date!(2025 - 03 - 03), Some("weekly_3_log_submitted")),
            entry(2, date!(2025 - 02 - 17), Some("weekly_1_log_approved")),
            entry(3, date!(2025 - 03 - 04), Some("weekly_3_log_submitted")),
            entry(4, date!(2025 - 03 - 17), Some("weekly_5_log_rejected_late")),
            entry(5, date!(2025 - 03 - 18), None),
            entry(6, date!(2025 - 03 - 19), Some("daily standup")),
        ];

        assert_eq!(tagged_weeks(&entries), vec![1, 3, 5]);
    }

    #[test]
    fn no_entries_no_weeks() {
        assert!(tagged_weeks(&[]).is_empty());
    }

    #[test]
    fn precedence_approved_wins() {
        let entries = vec![
            entry(1, date!(2025 - 03 - 03), Some("weekly_2_log_submitted")),
            entry(2, date!(2025 - 03 - 04), Some("weekly_2_log_approved")),
        ];
        assert_eq!(aggregate_state(&entries), BundleState::Approved);
    }

    #[test]
    fn precedence_rejected_beats_submitted() {
        let entries = vec![
            entry(1, date!(2025 - 03 - 03), Some("weekly_2_log_submitted")),
            entry(2, date!(2025 - 03 - 04), Some("weekly_2_log_rejected_gaps")),
            entry(3, date!(2025 - 03 - 05), Some("weekly_2_log_submitted")),
        ];
        assert_eq!(aggregate_state(&entries), BundleState::Rejected);
    }

    #[test]
    fn untagged_entries_are_draft() {
        let entries = vec![
            entry(1, date!(2025 - 03 - 03), None),
            entry(2, date!(2025 - 03 - 04), Some("pair programming")),
        ];
        assert_eq!(aggregate_state(&entries), BundleState::Draft);
    }

    #[test]
    fn assemble_sorts_and_ranges() {
        let entries = vec![
            entry(2, date!(2025 - 03 - 05), Some("weekly_4_log_submitted")),
            entry(1, date!(2025 - 03 - 03), Some("weekly_4_log_submitted")),
            entry(3, date!(2025 - 03 - 04), Some("weekly_4_log_submitted")),
            // different week, must not leak into the bundle
            entry(9, date!(2025 - 02 - 25), Some("weekly_3_log_approved")),
        ];

        let bundle = WeeklyBundle::assemble(4, entries);
        assert_eq!(bundle.week, 4);
        assert_eq!(bundle.entry_count, 3);
        assert_eq!(bundle.state, BundleState::Submitted);
        assert_eq!(bundle.first_date, Some(date!(2025 - 03 - 03)));
        assert_eq!(bundle.last_date, Some(date!(2025 - 03 - 05)));
        let ids: Vec<i32> = bundle.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn assemble_empty_week_is_draft() {
        let bundle = WeeklyBundle::assemble(7, vec![]);
        assert_eq!(bundle.entry_count, 0);
        assert_eq!(bundle.state, BundleState::Draft);
        assert_eq!(bundle.first_date, None);
        assert_eq!(bundle.last_date, None);
    }
}
