use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::envelope::{ErrorResponse, MessageResponse};
use crate::presentation::http::handlers::blogs::{BlogData, BlogDto, BlogFieldsDto, BlogListData};
use crate::presentation::http::handlers::files::{FileData, FileDto, FileListData, FileUploadForm};
use crate::presentation::http::handlers::users::{
    LoginData, LoginDto, RegisterDto, UpdateProfileDto, UserData, UserDto, UsersData,
};
use crate::presentation::http::session::SESSION_COOKIE;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::users::register,
        crate::presentation::http::handlers::users::login,
        crate::presentation::http::handlers::users::logout,
        crate::presentation::http::handlers::users::update_profile,
        crate::presentation::http::handlers::users::list_users,
        crate::presentation::http::handlers::blogs::list_blogs,
        crate::presentation::http::handlers::blogs::get_blog,
        crate::presentation::http::handlers::blogs::create_blog,
        crate::presentation::http::handlers::blogs::update_blog,
        crate::presentation::http::handlers::blogs::delete_blog,
        crate::presentation::http::handlers::files::list_files,
        crate::presentation::http::handlers::files::upload_file,
        crate::presentation::http::handlers::files::delete_file
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            RegisterDto,
            LoginDto,
            UpdateProfileDto,
            UserDto,
            UserData,
            LoginData,
            UsersData,
            BlogFieldsDto,
            BlogDto,
            BlogData,
            BlogListData,
            FileUploadForm,
            FileDto,
            FileData,
            FileListData
        )
    ),
    tags(
        (name = "users", description = "Registration, login and profile endpoints"),
        (name = "blogs", description = "Blog endpoints"),
        (name = "files", description = "File upload endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
        openapi.components = Some(components);
    }
}
