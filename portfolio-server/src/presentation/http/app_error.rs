use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::error::DomainError;
use crate::presentation::http::envelope::ErrorResponse;

pub(crate) const TOKEN_MISSING_MESSAGE: &str = "Unauthorized access - please login first";
pub(crate) const TOKEN_INVALID_MESSAGE: &str = "Invalid or expired token - please login again";

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("session token missing")]
    TokenMissing,

    #[error("session token invalid")]
    TokenInvalid,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(format!("invalid multipart body: {}", err.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Domain(err) => match err {
                DomainError::Validation(violations) => (
                    StatusCode::BAD_REQUEST,
                    "Validation failed".to_string(),
                    Some(violations.iter().map(ToString::to_string).collect()),
                ),
                DomainError::NotFound(what) => {
                    (StatusCode::NOT_FOUND, format!("Not found: {what}"), None)
                }
                DomainError::Conflict(message) => (StatusCode::CONFLICT, message, None),
                DomainError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
                DomainError::Internal(message) => {
                    error!(error = %message, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                        Some(vec![message]),
                    )
                }
            },
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(flatten_validation_errors(&err)),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                TOKEN_MISSING_MESSAGE.to_string(),
                None,
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                TOKEN_INVALID_MESSAGE.to_string(),
                None,
            ),
            AppError::Internal(err) => {
                error!(error = ?err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(vec![err.to_string()]),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
                errors,
            }),
        )
            .into_response()
    }
}

fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, list)| {
            list.iter().map(move |err| match &err.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", err.code),
            })
        })
        .collect();
    messages.sort();
    messages
}
