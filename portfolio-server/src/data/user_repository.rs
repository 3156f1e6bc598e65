use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::id::RecordId;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) id: RecordId,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

/// Full replacement of the mutable user columns.
#[derive(Debug, Clone)]
pub(crate) struct UserChanges {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: &RecordId) -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_email(
        &self,
        email: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_username(
        &self,
        username: &str,
        exclude: Option<&RecordId>,
    ) -> Result<Option<UserCredentials>, DomainError>;
    async fn update_user(
        &self,
        id: &RecordId,
        changes: UserChanges,
    ) -> Result<Option<User>, DomainError>;
    async fn list_users(&self) -> Result<Vec<User>, DomainError>;
}
