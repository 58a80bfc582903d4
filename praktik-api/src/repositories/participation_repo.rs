use serde::Serialize;
use sqlx::PgPool;

use crate::domain::Participation;

use super::repo_error::RepositoryError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

pub trait ParticipationRepository {
    async fn assignment_rows(&self, user_id: i32) -> Result<Vec<Participation>, RepositoryError>;
    async fn project(&self, project_id: i32) -> Result<Option<Project>, RepositoryError>;
}

pub struct ParticipationRepositoryImpl {
    pool: PgPool,
}

impl ParticipationRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ParticipationRepository for ParticipationRepositoryImpl {
    async fn assignment_rows(&self, user_id: i32) -> Result<Vec<Participation>, RepositoryError> {
        // All rows of every project the user belongs to, so the resolver
        // sees both their own membership and the projects' pic rows.
        let rows = sqlx::query_as::<_, Participation>(
            r#"
            SELECT id, project_id, user_id, role_in_project
            FROM project_participants
            WHERE project_id IN (
                SELECT project_id FROM project_participants WHERE user_id = $1
            )
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn project(&self, project_id: i32) -> Result<Option<Project>, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }
}
