use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::password::PasswordHasher;
use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::id::RecordId;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService {
    repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub(crate) fn new(repo: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self {
            repo,
            jwt,
            hasher: PasswordHasher,
        }
    }

    #[instrument(skip_all, fields(username = %req.username))]
    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;

        // Pre-check for a friendly message; the unique index still decides
        // when two registrations race.
        if self.repo.find_by_email(&req.email, None).await?.is_some() {
            return Err(DomainError::Conflict(
                "user with this email already exists".to_string(),
            ));
        }
        if self
            .repo
            .find_by_username(&req.username, None)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(
                "user with this username already exists".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&req.password)?;
        let user = self
            .repo
            .create_user(Self::into_new_user(req, password_hash))
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip_all)]
    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.repo.find_by_email(&req.email, None).await? {
            Some(user_creds) => user_creds,
            None => {
                self.hasher.verify_dummy(&req.password);
                return Err(DomainError::NotFound("user".to_string()));
            }
        };

        if !self.hasher.verify(&req.password, &user_creds.password_hash)? {
            return Err(DomainError::Unauthorized("invalid credentials".to_string()));
        }

        let access_token = self
            .jwt
            .generate_token(&user_creds.user.id, &user_creds.user.email)
            .map_err(|err| DomainError::Internal(err.to_string()))?;

        info!(user_id = %user_creds.user.id, "user logged in");
        Ok(AuthResult {
            user: user_creds.user,
            access_token,
        })
    }

    fn into_new_user(req: RegisterRequest, password_hash: String) -> NewUser {
        NewUser {
            id: RecordId::generate(),
            username: req.username,
            email: req.email,
            password_hash,
        }
    }
}
