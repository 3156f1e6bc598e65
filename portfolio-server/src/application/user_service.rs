use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::password::PasswordHasher;
use crate::data::user_repository::{UserChanges, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::id::RecordId;
use crate::domain::user::{UpdateProfileRequest, User};

pub(crate) struct UserService {
    repo: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserService {
    pub(crate) fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            repo,
            hasher: PasswordHasher,
        }
    }

    pub(crate) async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list_users().await
    }

    #[instrument(skip_all, fields(user_id = %actor_id))]
    pub(crate) async fn update_profile(
        &self,
        actor_id: &RecordId,
        req: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;

        let current = self
            .repo
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {actor_id}")))?;

        if req.is_empty() {
            return Ok(current.user);
        }

        if let Some(username) = req.username.as_deref()
            && username != current.user.username
            && self
                .repo
                .find_by_username(username, Some(actor_id))
                .await?
                .is_some()
        {
            return Err(DomainError::Conflict(
                "user with this username already exists".to_string(),
            ));
        }

        if let Some(email) = req.email.as_deref()
            && email != current.user.email
            && self
                .repo
                .find_by_email(email, Some(actor_id))
                .await?
                .is_some()
        {
            return Err(DomainError::Conflict(
                "user with this email already exists".to_string(),
            ));
        }

        let password_hash = match req.new_password.as_deref() {
            Some(new_password) => {
                let current_password = req.current_password.as_deref().unwrap_or_default();
                if !self
                    .hasher
                    .verify(current_password, &current.password_hash)?
                {
                    return Err(DomainError::Unauthorized(
                        "current password is incorrect".to_string(),
                    ));
                }
                self.hasher.hash(new_password)?
            }
            None => current.password_hash,
        };

        let changes = UserChanges {
            username: req.username.unwrap_or(current.user.username),
            email: req.email.unwrap_or(current.user.email),
            password_hash,
        };

        let updated = self
            .repo
            .update_user(actor_id, changes)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {actor_id}")))?;

        info!("user profile updated");
        Ok(updated)
    }
}
