pub(crate) mod blog;
pub(crate) mod error;
pub(crate) mod file;
pub(crate) mod id;
pub(crate) mod media;
pub(crate) mod user;
