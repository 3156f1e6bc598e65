use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::{DomainError, FieldViolation, Violations};
use super::id::RecordId;

pub(crate) const USERNAME_MIN_LEN: usize = 3;
pub(crate) const USERNAME_MAX_LEN: usize = 30;
pub(crate) const PASSWORD_MIN_LEN: usize = 8;
pub(crate) const PASSWORD_MAX_LEN: usize = 128;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::new();
        let username = violations.check(normalize_username(&self.username));
        let email = violations.check(normalize_email(&self.email));
        violations.check(check_password_len("password", &self.password));
        violations.into_result()?;

        Ok(Self {
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::new();
        let email = violations.check(normalize_email(&self.email));
        if self.password.is_empty() {
            violations.push("password", "must not be empty");
        }
        violations.into_result()?;

        Ok(Self {
            email: email.unwrap_or_default(),
            password: self.password,
        })
    }
}

/// Partial profile update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UpdateProfileRequest {
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) current_password: Option<String>,
    pub(crate) new_password: Option<String>,
}

impl UpdateProfileRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::new();

        let username = match self.username.as_deref() {
            Some(raw) => violations.check(normalize_username(raw)),
            None => None,
        };
        let email = match self.email.as_deref() {
            Some(raw) => violations.check(normalize_email(raw)),
            None => None,
        };

        if let Some(new_password) = self.new_password.as_deref() {
            violations.check(check_password_len("newPassword", new_password));
            if self
                .current_password
                .as_deref()
                .is_none_or(|current| current.is_empty())
            {
                violations.push("currentPassword", "is required to change the password");
            }
        }
        violations.into_result()?;

        Ok(Self {
            username,
            email,
            current_password: self.current_password,
            new_password: self.new_password,
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.new_password.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct User {
    pub(crate) id: RecordId,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: RecordId,
        username: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut violations = Violations::new();
        let username = violations.check(normalize_username(&username.into()));
        let email = violations.check(normalize_email(&email.into()));
        if updated_at < created_at {
            violations.push("updated_at", "must be >= created_at");
        }
        violations.into_result()?;

        Ok(Self {
            id,
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            created_at,
            updated_at,
        })
    }
}

fn normalize_username(username: &str) -> Result<String, FieldViolation> {
    let username = username.trim();
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(FieldViolation::new(
            "username",
            format!("must be {USERNAME_MIN_LEN}..{USERNAME_MAX_LEN} chars"),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(FieldViolation::new(
            "username",
            "may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, FieldViolation> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(FieldViolation::new("email", "must be a valid email"));
    }
    Ok(email)
}

fn check_password_len(field: &'static str, password: &str) -> Result<(), FieldViolation> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(FieldViolation::new(
            field,
            format!("must be {PASSWORD_MIN_LEN}..{PASSWORD_MAX_LEN} chars"),
        ));
    }
    Ok(())
}
