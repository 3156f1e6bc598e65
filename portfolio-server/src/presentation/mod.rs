use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::file_service::FileService;
use crate::application::user_service::UserService;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService>,
    pub(crate) user_service: Arc<UserService>,
    pub(crate) blog_service: Arc<BlogService>,
    pub(crate) file_service: Arc<FileService>,
    pub(crate) jwt: Arc<JwtService>,
    pub(crate) max_upload_bytes: usize,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService>,
        user_service: Arc<UserService>,
        blog_service: Arc<BlogService>,
        file_service: Arc<FileService>,
        jwt: Arc<JwtService>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            blog_service,
            file_service,
            jwt,
            max_upload_bytes,
        }
    }
}
