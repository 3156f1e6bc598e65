use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::blog_service::BlogService;
use application::file_service::FileService;
use application::user_service::UserService;
use data::repositories::postgres::blog_repository::PostgresBlogRepository;
use data::repositories::postgres::file_repository::PostgresFileRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::cloudinary::CloudinaryMediaStore;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;
    info!(http_addr = %settings.http_addr, media = ?settings.media, "starting portfolio-server");

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let jwt = Arc::new(JwtService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));
    let media = Arc::new(CloudinaryMediaStore::new(settings.media.clone()));
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let max_upload_bytes = settings.media.max_upload_bytes;

    let state = AppState::new(
        Arc::new(AuthService::new(users.clone(), jwt.clone())),
        Arc::new(UserService::new(users)),
        Arc::new(BlogService::new(
            Arc::new(PostgresBlogRepository::new(pool.clone())),
            media.clone(),
            max_upload_bytes,
        )),
        Arc::new(FileService::new(
            Arc::new(PostgresFileRepository::new(pool)),
            media,
            max_upload_bytes,
        )),
        jwt,
        max_upload_bytes,
    );

    server::run_http(&settings, state).await
}
