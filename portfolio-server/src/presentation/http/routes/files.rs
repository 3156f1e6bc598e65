use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::files::{delete_file, list_files, upload_file};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;
use crate::presentation::http::routes::upload_body_limit;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/", get(list_files));

    let protected = Router::new()
        .route("/upload", post(upload_file))
        .route("/{id}", delete(delete_file))
        .layer(upload_body_limit(state.max_upload_bytes))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
