pub(crate) mod blog_repository;
pub(crate) mod file_repository;
pub(crate) mod media_store;
pub(crate) mod repositories;
pub(crate) mod user_repository;
