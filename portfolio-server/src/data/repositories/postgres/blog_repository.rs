use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::errors::map_db_error;
use crate::data::blog_repository::{BlogPage, BlogPageQuery, BlogRepository, NewBlog};
use crate::domain::blog::{Blog, BlogContent, MAX_VIEWS};
use crate::domain::error::DomainError;
use crate::domain::id::RecordId;

#[derive(Debug, Clone)]
pub(crate) struct PostgresBlogRepository {
    pool: PgPool,
}

impl PostgresBlogRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BlogRow {
    id: String,
    title: String,
    img: String,
    img_storage_id: Option<String>,
    category: Option<String>,
    description: String,
    short_description: Option<String>,
    views: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row of the page query: the count is always present, the blog columns are
/// NULL when the page is empty.
#[derive(sqlx::FromRow)]
struct BlogPageRow {
    total_count: i64,
    id: Option<String>,
    title: Option<String>,
    img: Option<String>,
    img_storage_id: Option<String>,
    category: Option<String>,
    description: Option<String>,
    short_description: Option<String>,
    views: Option<i32>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BlogPageRow {
    fn into_blog_row(self) -> Option<BlogRow> {
        Some(BlogRow {
            id: self.id?,
            title: self.title?,
            img: self.img?,
            img_storage_id: self.img_storage_id,
            category: self.category,
            description: self.description?,
            short_description: self.short_description,
            views: self.views?,
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn create_blog(&self, input: NewBlog) -> Result<Blog, DomainError> {
        let content = input.content;
        let row = sqlx::query_as::<_, BlogRow>(
            r#"
            INSERT INTO blogs (id, title, img, img_storage_id, category, description, short_description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, img, img_storage_id, category, description, short_description,
                      views, created_at, updated_at
            "#,
        )
        .bind(input.id.as_str())
        .bind(&content.title)
        .bind(&content.img)
        .bind(&content.img_storage_id)
        .bind(&content.category)
        .bind(&content.description)
        .bind(&content.short_description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_row_to_blog(row)
    }

    async fn get_blog(&self, id: &RecordId) -> Result<Option<Blog>, DomainError> {
        let row = sqlx::query_as::<_, BlogRow>(
            r#"
            SELECT
            id,
            title,
            img,
            img_storage_id,
            category,
            description,
            short_description,
            views,
            created_at,
            updated_at
            FROM blogs
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_blog).transpose()
    }

    async fn record_view(&self, id: &RecordId) -> Result<Option<Blog>, DomainError> {
        let row = sqlx::query_as::<_, BlogRow>(
            r#"
            UPDATE blogs
            SET views = LEAST(views + 1, $2)
            WHERE id = $1
            RETURNING id, title, img, img_storage_id, category, description, short_description,
                      views, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(MAX_VIEWS)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_blog).transpose()
    }

    async fn find_by_title(
        &self,
        title: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<Blog>, DomainError> {
        let row = sqlx::query_as::<_, BlogRow>(
            r#"
            SELECT
            id,
            title,
            img,
            img_storage_id,
            category,
            description,
            short_description,
            views,
            created_at,
            updated_at
            FROM blogs
            WHERE title = $1
              AND ($2::TEXT IS NULL OR id <> $2)
            "#,
        )
        .bind(title)
        .bind(exclude.map(RecordId::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_blog).transpose()
    }

    async fn update_blog(
        &self,
        id: &RecordId,
        content: BlogContent,
    ) -> Result<Option<Blog>, DomainError> {
        let row = sqlx::query_as::<_, BlogRow>(
            r#"
            UPDATE blogs
            SET title = $2,
                img = $3,
                img_storage_id = $4,
                category = $5,
                description = $6,
                short_description = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, img, img_storage_id, category, description, short_description,
                      views, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(&content.title)
        .bind(&content.img)
        .bind(&content.img_storage_id)
        .bind(&content.category)
        .bind(&content.description)
        .bind(&content.short_description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_blog).transpose()
    }

    async fn delete_blog(&self, id: &RecordId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM blogs
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn page_blogs(&self, query: &BlogPageQuery) -> Result<BlogPage, DomainError> {
        // Count and slice come from one statement so both see the same snapshot.
        let rows = sqlx::query_as::<_, BlogPageRow>(
            r#"
            WITH filtered AS (
                SELECT id, title, img, img_storage_id, category, description,
                       short_description, views, created_at, updated_at
                FROM blogs
                WHERE ($1::TEXT IS NULL OR category = $1)
            ),
            total AS (
                SELECT COUNT(*) AS total_count FROM filtered
            )
            SELECT
                total.total_count AS "total_count",
                page.id,
                page.title,
                page.img,
                page.img_storage_id,
                page.category,
                page.description,
                page.short_description,
                page.views,
                page.created_at,
                page.updated_at
            FROM total
            LEFT JOIN LATERAL (
                SELECT *
                FROM filtered
                ORDER BY created_at DESC, id DESC
                LIMIT $2
                OFFSET $3
            ) AS page ON TRUE
            ORDER BY page.created_at DESC, page.id DESC
            "#,
        )
        .bind(query.category.as_deref())
        .bind(i64::from(query.limit))
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let total = rows.first().map(|row| row.total_count).unwrap_or(0);
        let blogs = rows
            .into_iter()
            .filter_map(BlogPageRow::into_blog_row)
            .map(map_row_to_blog)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BlogPage { total, blogs })
    }
}

fn map_row_to_blog(row: BlogRow) -> Result<Blog, DomainError> {
    Blog::new(
        RecordId::from_stored(row.id),
        BlogContent {
            title: row.title,
            img: row.img,
            img_storage_id: row.img_storage_id,
            category: row.category,
            description: row.description,
            short_description: row.short_description,
        },
        row.views,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Internal(err.to_string()))
}
