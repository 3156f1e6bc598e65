use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::errors::map_db_error;
use crate::data::user_repository::{NewUser, UserChanges, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::id::RecordId;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(input.id.as_str())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_row_to_credentials(row).map(|creds| creds.user)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
            id,
            username,
            email,
            password_hash,
            created_at,
            updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_credentials).transpose()
    }

    async fn find_by_email(
        &self,
        email: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
            id,
            username,
            email,
            password_hash,
            created_at,
            updated_at
            FROM users
            WHERE email = $1
              AND ($2::TEXT IS NULL OR id <> $2)
            "#,
        )
        .bind(email)
        .bind(exclude.map(RecordId::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_credentials).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
            id,
            username,
            email,
            password_hash,
            created_at,
            updated_at
            FROM users
            WHERE username = $1
              AND ($2::TEXT IS NULL OR id <> $2)
            "#,
        )
        .bind(username)
        .bind(exclude.map(RecordId::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_credentials).transpose()
    }

    async fn update_user(
        &self,
        id: &RecordId,
        changes: UserChanges,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = $2,
                email = $3,
                password_hash = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_credentials)
            .transpose()
            .map(|creds| creds.map(|creds| creds.user))
    }

    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password_hash,
                created_at,
                updated_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter()
            .map(|row| map_row_to_credentials(row).map(|creds| creds.user))
            .collect()
    }
}

fn map_row_to_credentials(row: UserRow) -> Result<UserCredentials, DomainError> {
    let user = User::new(
        RecordId::from_stored(row.id),
        row.username,
        row.email,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Internal(err.to_string()))?;

    Ok(UserCredentials {
        user,
        password_hash: row.password_hash,
    })
}
