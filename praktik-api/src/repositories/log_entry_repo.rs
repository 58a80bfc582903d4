use sqlx::PgPool;
use time::Date;

use crate::domain::models::LogEntry;
use crate::domain::{APPROVED_LIKE, REJECTED_LIKE, SUBMITTED_LIKE};

use super::repo_error::RepositoryError;

const ENTRY_COLUMNS: &str = "id, user_id, project_id, task_id, entry_date, start_time, end_time, \
     duration_minutes, content, category, attachments, created_at";

pub trait LogEntryRepository {
    async fn create(&self, entry: &NewLogEntry) -> Result<LogEntry, RepositoryError>;
    async fn entries_in_range(
        &self,
        user_id: i32,
        from: Date,
        to: Date,
    ) -> Result<Vec<LogEntry>, RepositoryError>;
    async fn tagged_entries(&self, user_id: i32) -> Result<Vec<LogEntry>, RepositoryError>;
    async fn week_entries(
        &self,
        user_id: i32,
        week_pattern: &str,
    ) -> Result<Vec<LogEntry>, RepositoryError>;
    async fn submission_candidates(
        &self,
        user_id: i32,
        week_pattern: &str,
        from: Date,
        to: Date,
    ) -> Result<Vec<LogEntry>, RepositoryError>;
    async fn retag(&self, entry_id: i32, category: &str) -> Result<(), RepositoryError>;
    async fn delete_by_ids(&self, ids: &[i32]) -> Result<u64, RepositoryError>;
}

pub struct LogEntryRepositoryImpl {
    pool: PgPool,
}

impl LogEntryRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct NewLogEntry {
    pub user_id: i32,
    pub project_id: Option<i32>,
    pub task_id: Option<i32>,
    pub entry_date: Date,
    pub start_time: Option<time::Time>,
    pub end_time: Option<time::Time>,
    pub duration_minutes: i32,
    pub content: String,
    pub attachments: Option<Vec<String>>,
}

impl LogEntryRepository for LogEntryRepositoryImpl {
    async fn create(&self, entry: &NewLogEntry) -> Result<LogEntry, RepositoryError> {
        let created = sqlx::query_as::<_, LogEntry>(&format!(
            r#"
            INSERT INTO log_entries
                (user_id, project_id, task_id, entry_date, start_time, end_time, duration_minutes, content, attachments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry.user_id)
        .bind(entry.project_id)
        .bind(entry.task_id)
        .bind(entry.entry_date)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.duration_minutes)
        .bind(&entry.content)
        .bind(&entry.attachments)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn entries_in_range(
        &self,
        user_id: i32,
        from: Date,
        to: Date,
    ) -> Result<Vec<LogEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, LogEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM log_entries
            WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
            ORDER BY entry_date, id
            "#
        ))
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn tagged_entries(&self, user_id: i32) -> Result<Vec<LogEntry>, RepositoryError> {
        let patterns: Vec<String> = [SUBMITTED_LIKE, APPROVED_LIKE, REJECTED_LIKE]
            .iter()
            .map(|p| p.to_string())
            .collect();

        let entries = sqlx::query_as::<_, LogEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM log_entries
            WHERE user_id = $1 AND category LIKE ANY($2)
            ORDER BY entry_date, id
            "#
        ))
        .bind(user_id)
        .bind(patterns)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn week_entries(
        &self,
        user_id: i32,
        week_pattern: &str,
    ) -> Result<Vec<LogEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, LogEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM log_entries
            WHERE user_id = $1 AND category LIKE $2
            ORDER BY entry_date, id
            "#
        ))
        .bind(user_id)
        .bind(week_pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn submission_candidates(
        &self,
        user_id: i32,
        week_pattern: &str,
        from: Date,
        to: Date,
    ) -> Result<Vec<LogEntry>, RepositoryError> {
        // Date range picks up daily drafts; the LIKE arm picks up entries
        // already tagged for this week (resubmission after a rejection).
        // Entries tagged for other weeks are filtered out by the caller,
        // which can actually decode the tags.
        let entries = sqlx::query_as::<_, LogEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM log_entries
            WHERE user_id = $1
              AND (entry_date BETWEEN $2 AND $3 OR category LIKE $4)
            ORDER BY entry_date, id
            "#
        ))
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(week_pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn retag(&self, entry_id: i32, category: &str) -> Result<(), RepositoryError> {
        let query_result = sqlx::query(
            r#"
            UPDATE log_entries SET category = $1 WHERE id = $2
            "#,
        )
        .bind(category)
        .bind(entry_id)
        .execute(&self.pool)
        .await?;

        if query_result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(entry_id.to_string()));
        }

        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[i32]) -> Result<u64, RepositoryError> {
        let query_result = sqlx::query(
            r#"
            DELETE FROM log_entries WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(query_result.rows_affected())
    }
}
