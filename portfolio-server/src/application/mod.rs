pub(crate) mod auth_service;
pub(crate) mod blog_service;
pub(crate) mod file_service;
mod media;
pub(crate) mod password;
pub(crate) mod user_service;
