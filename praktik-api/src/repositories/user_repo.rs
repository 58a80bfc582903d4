use sqlx::PgPool;

use crate::domain::models::UserId;
use crate::domain::{Role, User};

use super::repo_error::RepositoryError;

pub trait UserRepository {
    async fn get_user(&self, id: UserId) -> Result<User, RepositoryError>;
    async fn upsert_user(&self, user: &NewUser) -> Result<User, RepositoryError>;
}

pub struct UserRepositoryImpl {
    pool: PgPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    full_name: String,
    picture: String,
    access_token: String,
    role: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            email: row.email,
            full_name: row.full_name,
            picture: row.picture,
            access_token: row.access_token,
            role: Role::from(row.role),
        }
    }
}

impl UserRepository for UserRepositoryImpl {
    async fn get_user(&self, id: UserId) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, full_name, picture, access_token, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }

    async fn upsert_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        // The role is assigned by program staff out-of-band; a login
        // refresh must not reset it, so the conflict arm leaves it alone.
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, full_name, picture, access_token)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(email) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                picture = EXCLUDED.picture,
                access_token = EXCLUDED.access_token
            RETURNING id, email, full_name, picture, access_token, role
            "#,
        )
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.picture)
        .bind(&user.access_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }
}

pub struct NewUser {
    email: String,
    full_name: String,
    picture: String,
    access_token: String,
}

impl NewUser {
    pub fn new(email: String, full_name: String, picture: String, access_token: String) -> Self {
        Self {
            email,
            full_name,
            picture,
            access_token,
        }
    }
}
