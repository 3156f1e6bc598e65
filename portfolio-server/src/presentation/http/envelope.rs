use axum::{Json, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope shared by every endpoint under `/api/v1`.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ApiResponse<T> {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) data: T,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ErrorResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) errors: Option<Vec<String>>,
}

pub(crate) type Envelope<T> = (StatusCode, Json<ApiResponse<T>>);

pub(crate) fn respond<T>(status: StatusCode, message: impl Into<String>, data: T) -> Envelope<T> {
    (
        status,
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data,
        }),
    )
}
