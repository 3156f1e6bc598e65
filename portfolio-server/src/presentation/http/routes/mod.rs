use axum::Router;
use axum::extract::DefaultBodyLimit;

use crate::presentation::AppState;

pub(crate) mod blogs;
pub(crate) mod files;
pub(crate) mod users;

/// Multipart framing and text fields ride on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub(crate) fn upload_body_limit(max_upload_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
}

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/v1/users", users::router(state.clone()))
        .nest("/api/v1/blogs", blogs::router(state.clone()))
        .nest("/api/v1/files", files::router(state))
}

#[cfg(test)]
mod tests;
