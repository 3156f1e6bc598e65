pub(crate) mod blogs;
pub(crate) mod files;
pub(crate) mod users;
