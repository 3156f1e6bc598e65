use axum::{
    extract::State,
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::file::{StoredFile, UploadFileRequest};
use crate::domain::media::MediaUpload;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::envelope::{ApiResponse, Envelope, ErrorResponse, respond};
use crate::presentation::http::extract::{ApiMultipart, IdPath};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileDto {
    pub(crate) id: String,
    pub(crate) filename: String,
    pub(crate) url: String,
    pub(crate) external_storage_id: String,
    pub(crate) resource_type: String,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FileData {
    pub(crate) file: FileDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FileListData {
    pub(crate) count: usize,
    pub(crate) files: Vec<FileDto>,
}

/// Multipart layout accepted by the upload endpoint (documentation only).
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub(crate) struct FileUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub(crate) file: Vec<u8>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
}

impl From<StoredFile> for FileDto {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id.to_string(),
            filename: file.filename,
            url: file.url,
            external_storage_id: file.external_storage_id,
            resource_type: file.resource_type,
            title: file.title,
            description: file.description,
            created_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/files",
    tag = "files",
    responses(
        (status = 200, description = "All files, newest first", body = ApiResponse<FileListData>),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn list_files(State(state): State<AppState>) -> AppResult<Envelope<FileListData>> {
    let files = state.file_service.list_files().await?;

    Ok(respond(
        StatusCode::OK,
        "Files retrieved successfully",
        FileListData {
            count: files.len(),
            files: files.into_iter().map(FileDto::from).collect(),
        },
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/files/upload",
    tag = "files",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body(content = FileUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded", body = ApiResponse<FileData>),
        (status = 400, description = "Missing file, disallowed type or oversized", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn upload_file(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    ApiMultipart(mut multipart): ApiMultipart,
) -> AppResult<Envelope<FileData>> {
    let mut req = UploadFileRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                req.upload = Some(MediaUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "title" => req.title = Some(field.text().await?),
            "description" => req.description = Some(field.text().await?),
            _ => {}
        }
    }

    let file = state.file_service.upload_file(req).await?;

    Ok(respond(
        StatusCode::CREATED,
        "File uploaded successfully",
        FileData { file: file.into() },
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/files/{id}",
    tag = "files",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "File id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "File deleted", body = ApiResponse<FileData>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_file(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    IdPath(id): IdPath,
) -> AppResult<Envelope<FileData>> {
    let file = state.file_service.delete_file(&id).await?;

    Ok(respond(
        StatusCode::OK,
        "File deleted successfully",
        FileData { file: file.into() },
    ))
}
