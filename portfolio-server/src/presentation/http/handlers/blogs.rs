use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::blog_service::ListBlogsResult;
use crate::domain::blog::{Blog, CreateBlogRequest, UpdateBlogRequest};
use crate::domain::media::MediaUpload;
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppError, AppResult};
use crate::presentation::http::envelope::{ApiResponse, Envelope, ErrorResponse, respond};
use crate::presentation::http::extract::{ApiJson, ApiMultipart, IdPath, QueryPairs};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

/// Blog fields as sent by clients, either as JSON or as multipart text parts.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlogFieldsDto {
    #[validate(length(max = 1024))]
    pub(crate) title: Option<String>,
    #[validate(length(max = 4096))]
    pub(crate) img: Option<String>,
    #[validate(length(max = 128))]
    pub(crate) category: Option<String>,
    pub(crate) description: Option<String>,
    #[validate(length(max = 1024))]
    #[serde(alias = "short_description")]
    pub(crate) short_description: Option<String>,
}

impl BlogFieldsDto {
    fn into_create_request(self) -> CreateBlogRequest {
        CreateBlogRequest {
            title: self.title,
            img: self.img,
            category: self.category,
            description: self.description,
            short_description: self.short_description,
        }
    }

    fn into_update_request(self) -> UpdateBlogRequest {
        UpdateBlogRequest {
            title: self.title,
            img: self.img,
            category: self.category,
            description: self.description,
            short_description: self.short_description,
        }
    }
}

/// Body of blog create/update: JSON, or `multipart/form-data` with an
/// optional `image` file part.
#[derive(Debug)]
pub(crate) struct BlogForm {
    pub(crate) fields: BlogFieldsDto,
    pub(crate) image: Option<MediaUpload>,
}

impl<S> FromRequest<S> for BlogForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let ApiMultipart(multipart) = ApiMultipart::from_request(req, state).await?;
            read_blog_multipart(multipart).await
        } else {
            let ApiJson(fields) = ApiJson::<BlogFieldsDto>::from_request(req, state).await?;
            Ok(Self {
                fields,
                image: None,
            })
        }
    }
}

async fn read_blog_multipart(mut multipart: Multipart) -> Result<BlogForm, AppError> {
    let mut fields = BlogFieldsDto::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() || !filename.is_empty() {
                    image = Some(MediaUpload {
                        filename,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "title" => fields.title = Some(field.text().await?),
            "img" => fields.img = Some(field.text().await?),
            "category" => fields.category = Some(field.text().await?),
            "description" => fields.description = Some(field.text().await?),
            "shortDescription" | "short_description" => {
                fields.short_description = Some(field.text().await?)
            }
            _ => {}
        }
    }

    Ok(BlogForm { fields, image })
}

/// Raw strings so that junk values fall back to defaults instead of failing.
/// Built from [`QueryPairs`]; a repeated key uses its first value.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct BlogListQuery {
    /// Page number, 1-based (default 1)
    pub(crate) page: Option<String>,
    /// Page size (default 10, at most 100)
    pub(crate) limit: Option<String>,
    /// Category filter, case-insensitive
    pub(crate) category: Option<String>,
}

impl BlogListQuery {
    fn from_pairs(pairs: &QueryPairs) -> Self {
        Self {
            page: pairs.first("page").map(str::to_string),
            limit: pairs.first("limit").map(str::to_string),
            category: pairs.first("category").map(str::to_string),
        }
    }

    /// `0` stands for "use the default".
    fn positive(value: Option<&str>) -> u32 {
        value
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|value| *value > 0)
            .map(|value| u32::try_from(value).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlogDto {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) img: String,
    pub(crate) category: Option<String>,
    pub(crate) description: String,
    pub(crate) short_description: Option<String>,
    pub(crate) views: i32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct BlogData {
    pub(crate) blog: BlogDto,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlogListData {
    pub(crate) total_blogs: i64,
    pub(crate) current_page: u32,
    pub(crate) total_pages: i64,
    pub(crate) limit: u32,
    pub(crate) blogs: Vec<BlogDto>,
}

impl From<Blog> for BlogDto {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id.to_string(),
            title: blog.title,
            img: blog.img,
            category: blog.category,
            description: blog.description,
            short_description: blog.short_description,
            views: blog.views,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

impl From<ListBlogsResult> for BlogListData {
    fn from(result: ListBlogsResult) -> Self {
        Self {
            total_blogs: result.total,
            current_page: result.page,
            total_pages: result.total_pages,
            limit: result.limit,
            blogs: result.blogs.into_iter().map(BlogDto::from).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/blogs",
    tag = "blogs",
    params(BlogListQuery),
    responses(
        (status = 200, description = "Blogs listed, newest first", body = ApiResponse<BlogListData>),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn list_blogs(
    State(state): State<AppState>,
    pairs: QueryPairs,
) -> AppResult<Envelope<BlogListData>> {
    let query = BlogListQuery::from_pairs(&pairs);
    let page = BlogListQuery::positive(query.page.as_deref());
    let limit = BlogListQuery::positive(query.limit.as_deref());

    let result = state
        .blog_service
        .list_blogs(page, limit, query.category.as_deref())
        .await?;

    Ok(respond(
        StatusCode::OK,
        "Blogs retrieved successfully",
        BlogListData::from(result),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/blogs/{id}",
    tag = "blogs",
    params(
        ("id" = String, Path, description = "Blog id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Blog found; its view counter is incremented", body = ApiResponse<BlogData>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Blog not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_blog(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Envelope<BlogData>> {
    let blog = state.blog_service.get_blog(&id).await?;

    Ok(respond(
        StatusCode::OK,
        "Blog retrieved successfully",
        BlogData { blog: blog.into() },
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/blogs",
    tag = "blogs",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body(
        content = BlogFieldsDto,
        description = "JSON, or multipart/form-data with the same fields plus an optional `image` file"
    ),
    responses(
        (status = 201, description = "Blog created", body = ApiResponse<BlogData>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn create_blog(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    form: BlogForm,
) -> AppResult<Envelope<BlogData>> {
    form.fields.validate()?;

    let blog = state
        .blog_service
        .create_blog(form.fields.into_create_request(), form.image)
        .await?;

    Ok(respond(
        StatusCode::CREATED,
        "Blog created successfully",
        BlogData { blog: blog.into() },
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/blogs/{id}",
    tag = "blogs",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Blog id (24 hex characters)")
    ),
    request_body(
        content = BlogFieldsDto,
        description = "Partial update; omitted fields keep their values. Multipart may carry a replacement `image`."
    ),
    responses(
        (status = 200, description = "Blog updated", body = ApiResponse<BlogData>),
        (status = 400, description = "Validation error or malformed id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Blog not found", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn update_blog(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    IdPath(id): IdPath,
    form: BlogForm,
) -> AppResult<Envelope<BlogData>> {
    form.fields.validate()?;

    let blog = state
        .blog_service
        .update_blog(&id, form.fields.into_update_request(), form.image)
        .await?;

    Ok(respond(
        StatusCode::OK,
        "Blog updated successfully",
        BlogData { blog: blog.into() },
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/blogs/{id}",
    tag = "blogs",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Blog id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Blog deleted", body = ApiResponse<BlogData>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Blog not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_blog(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    IdPath(id): IdPath,
) -> AppResult<Envelope<BlogData>> {
    let blog = state.blog_service.delete_blog(&id).await?;

    Ok(respond(
        StatusCode::OK,
        "Blog deleted successfully",
        BlogData { blog: blog.into() },
    ))
}
