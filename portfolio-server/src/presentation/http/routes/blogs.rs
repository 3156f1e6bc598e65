use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::blogs::{
    create_blog, delete_blog, get_blog, list_blogs, update_blog,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;
use crate::presentation::http::routes::upload_body_limit;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_blogs))
        .route("/{id}", get(get_blog));

    let protected = Router::new()
        .route("/", post(create_blog))
        .route("/{id}", put(update_blog).delete(delete_blog))
        .layer(upload_body_limit(state.max_upload_bytes))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
