use crate::domain::error::DomainError;

const UNIQUE_VIOLATION: &str = "23505";

pub(super) fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && let Some(mapped) =
            classify_constraint_violation(db_err.code().as_deref(), db_err.constraint())
    {
        tracing::debug!(
            constraint = db_err.constraint(),
            "unique constraint caught on write"
        );
        return mapped;
    }
    DomainError::Internal(err.to_string())
}

/// Maps a unique-index violation to a conflict. This is the backstop for the
/// read-then-write uniqueness checks done by the services.
pub(super) fn classify_constraint_violation(
    code: Option<&str>,
    constraint: Option<&str>,
) -> Option<DomainError> {
    if code != Some(UNIQUE_VIOLATION) {
        return None;
    }
    let message = match constraint {
        Some("users_username_key") => "user with this username already exists",
        Some("users_email_key") => "user with this email already exists",
        Some("blogs_title_key") => "blog with this title already exists",
        _ => "record already exists",
    };
    Some(DomainError::Conflict(message.to_string()))
}
