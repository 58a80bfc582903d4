use serde::Serialize;

/// One logged unit of work, as stored in `log_entries`.
///
/// `category` doubles as the weekly lifecycle marker: `None` (or any string
/// the codec does not recognize) means a plain daily draft, a
/// `weekly_<N>_log_<state>` value ties the entry to week `<N>`'s bundle.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: i32,
    pub user_id: i32,
    pub project_id: Option<i32>,
    pub task_id: Option<i32>,
    pub entry_date: time::Date,
    pub start_time: Option<time::Time>,
    pub end_time: Option<time::Time>,
    pub duration_minutes: i32,
    pub content: String,
    pub category: Option<String>,
    pub attachments: Option<Vec<String>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}
