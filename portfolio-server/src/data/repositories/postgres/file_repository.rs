use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::errors::map_db_error;
use crate::data::file_repository::{FileRepository, NewFile};
use crate::domain::error::DomainError;
use crate::domain::file::StoredFile;
use crate::domain::id::RecordId;

#[derive(Debug, Clone)]
pub(crate) struct PostgresFileRepository {
    pool: PgPool,
}

impl PostgresFileRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FileRow {
    id: String,
    filename: String,
    url: String,
    external_storage_id: String,
    resource_type: String,
    title: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FileRow> for StoredFile {
    fn from(row: FileRow) -> Self {
        Self {
            id: RecordId::from_stored(row.id),
            filename: row.filename,
            url: row.url,
            external_storage_id: row.external_storage_id,
            resource_type: row.resource_type,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl FileRepository for PostgresFileRepository {
    async fn create_file(&self, input: NewFile) -> Result<StoredFile, DomainError> {
        let row = sqlx::query_as::<_, FileRow>(
            r#"
            INSERT INTO files (id, filename, url, external_storage_id, resource_type, title, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, filename, url, external_storage_id, resource_type, title, description,
                      created_at, updated_at
            "#,
        )
        .bind(input.id.as_str())
        .bind(&input.filename)
        .bind(&input.url)
        .bind(&input.external_storage_id)
        .bind(&input.resource_type)
        .bind(&input.title)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    async fn get_file(&self, id: &RecordId) -> Result<Option<StoredFile>, DomainError> {
        let row = sqlx::query_as::<_, FileRow>(
            r#"
            SELECT
            id,
            filename,
            url,
            external_storage_id,
            resource_type,
            title,
            description,
            created_at,
            updated_at
            FROM files
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(StoredFile::from))
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>, DomainError> {
        let rows = sqlx::query_as::<_, FileRow>(
            r#"
            SELECT
                id,
                filename,
                url,
                external_storage_id,
                resource_type,
                title,
                description,
                created_at,
                updated_at
            FROM files
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(StoredFile::from).collect())
    }

    async fn delete_file(&self, id: &RecordId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM files
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
