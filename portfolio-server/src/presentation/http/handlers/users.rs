use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{LoginRequest, RegisterRequest, UpdateProfileRequest, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::envelope::{
    ApiResponse, Envelope, ErrorResponse, MessageResponse, respond,
};
use crate::presentation::http::extract::ApiJson;
use crate::presentation::http::middleware::auth::AuthenticatedUser;
use crate::presentation::http::session::{with_session, without_session};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 1, message = "username is required"))]
    pub(crate) username: String,
    #[validate(length(min = 1, max = 254, message = "email is required"))]
    pub(crate) email: String,
    #[validate(length(min = 1, max = 1024, message = "password is required"))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 254, message = "email is required"))]
    pub(crate) email: String,
    #[validate(length(min = 1, max = 1024, message = "password is required"))]
    pub(crate) password: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProfileDto {
    #[validate(length(max = 64))]
    pub(crate) username: Option<String>,
    #[validate(length(max = 254))]
    pub(crate) email: Option<String>,
    #[validate(length(max = 1024))]
    pub(crate) current_password: Option<String>,
    #[validate(length(max = 1024))]
    pub(crate) new_password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserData {
    pub(crate) user: UserDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LoginData {
    pub(crate) user: UserDto,
    pub(crate) token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UsersData {
    pub(crate) users: Vec<UserDto>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered successfully", body = ApiResponse<UserData>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    ApiJson(dto): ApiJson<RegisterDto>,
) -> AppResult<Envelope<UserData>> {
    dto.validate()?;

    let req = RegisterRequest {
        username: dto.username,
        email: dto.email,
        password: dto.password,
    };

    let user = state.auth_service.register(req).await?;

    Ok(respond(
        StatusCode::CREATED,
        "User registered successfully",
        UserData { user: user.into() },
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful; sets the user-token cookie", body = ApiResponse<LoginData>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 404, description = "No user with this email", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(dto): ApiJson<LoginDto>,
) -> AppResult<(CookieJar, Envelope<LoginData>)> {
    dto.validate()?;

    let req = LoginRequest {
        email: dto.email,
        password: dto.password,
    };

    let result = state.auth_service.login(req).await?;
    let jar = with_session(jar, result.access_token.clone(), state.jwt.ttl_seconds());

    Ok((
        jar,
        respond(
            StatusCode::OK,
            "Login successful",
            LoginData {
                user: result.user.into(),
                token: result.access_token,
            },
        ),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    tag = "users",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub(crate) async fn logout(
    auth: AuthenticatedUser,
    jar: CookieJar,
) -> (CookieJar, (StatusCode, Json<MessageResponse>)) {
    info!(user_id = %auth.user_id, email = %auth.email, "user logged out");
    (
        without_session(jar),
        (
            StatusCode::OK,
            Json(MessageResponse {
                success: true,
                message: "Logged out successfully".to_string(),
            }),
        ),
    )
}

#[utoipa::path(
    put,
    path = "/api/v1/users/update",
    tag = "users",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserData>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized or wrong current password", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(dto): ApiJson<UpdateProfileDto>,
) -> AppResult<Envelope<UserData>> {
    dto.validate()?;

    let req = UpdateProfileRequest {
        username: dto.username,
        email: dto.email,
        current_password: dto.current_password,
        new_password: dto.new_password,
    };

    let user = state
        .user_service
        .update_profile(&auth.user_id, req)
        .await?;

    Ok(respond(
        StatusCode::OK,
        "Profile updated successfully",
        UserData { user: user.into() },
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "All users, newest first", body = ApiResponse<UsersData>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Envelope<UsersData>> {
    let users = state.user_service.list_users().await?;

    Ok(respond(
        StatusCode::OK,
        "Users retrieved successfully",
        UsersData {
            users: users.into_iter().map(UserDto::from).collect(),
        },
    ))
}
