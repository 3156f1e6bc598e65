pub(crate) mod blog_repository;
mod errors;
pub(crate) mod file_repository;
pub(crate) mod user_repository;
