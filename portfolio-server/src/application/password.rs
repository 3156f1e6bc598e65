use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher as _, PasswordVerifier,
        SaltString, rand_core::OsRng,
    },
};

use crate::domain::error::DomainError;

/// Argon2id hashing shared by registration, login and profile updates.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PasswordHasher;

impl PasswordHasher {
    /// Verified against when the account does not exist, so a miss costs the
    /// same as a wrong password.
    pub(crate) const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn hash(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    /// `Ok(false)` on a mismatch; `Err` only when the stored hash is unusable.
    pub(crate) fn verify(&self, raw_password: &str, password_hash: &str) -> Result<bool, DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        match Self::argon2()?.verify_password(raw_password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(err) => Err(DomainError::Internal(err.to_string())),
        }
    }

    /// Burns the same work as a real verification and discards the result.
    pub(crate) fn verify_dummy(&self, raw_password: &str) {
        let _ = self.verify(raw_password, Self::DUMMY_PASSWORD_HASH);
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
