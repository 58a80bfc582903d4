use serde::Serialize;
use sqlx::PgPool;

use super::repo_error::RepositoryError;

/// One recorded lifecycle action: who did what to whose week.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: i32,
    pub actor_id: i32,
    pub action: String,
    pub subject_user_id: i32,
    pub week: i64,
    pub detail: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

pub struct NewAuditRecord {
    pub actor_id: i32,
    pub action: String,
    pub subject_user_id: i32,
    pub week: i64,
    pub detail: Option<String>,
}

pub trait AuditRepository {
    async fn record(&self, record: &NewAuditRecord) -> Result<(), RepositoryError>;
    async fn recent(&self, limit: i64) -> Result<Vec<AuditRecord>, RepositoryError>;
}

pub struct AuditRepositoryImpl {
    pool: PgPool,
}

impl AuditRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AuditRepository for AuditRepositoryImpl {
    async fn record(&self, record: &NewAuditRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (actor_id, action, subject_user_id, week, detail)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.actor_id)
        .bind(&record.action)
        .bind(record.subject_user_id)
        .bind(record.week)
        .bind(&record.detail)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<AuditRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, AuditRecord>(
            r#"
            SELECT id, actor_id, action, subject_user_id, week, detail, created_at
            FROM audit_log
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
