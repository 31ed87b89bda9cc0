//! User registration for Corkboard.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{
    validate_email, validate_new_password, validate_username, ValidationError,
};
use crate::auth::{hash_password, PasswordError};
use crate::db::{NewUser, User, UserRepository};
use crate::ForumError;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A field failed validation.
    #[error("{field}: {error}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        error: ValidationError,
    },

    /// Username already exists.
    #[error("username already exists")]
    UsernameExists,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Storage failure.
    #[error(transparent)]
    Storage(#[from] ForumError),
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password in clear text.
    pub password: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> Result<(), RegistrationError> {
        let invalid = |field, error| RegistrationError::Validation { field, error };

        validate_username(&self.username).map_err(|e| invalid("username", e))?;
        validate_email(&self.email).map_err(|e| invalid("email", e))?;
        if let Some(error) = validate_new_password(&self.password, &self.username)
            .into_iter()
            .next()
        {
            return Err(invalid("password1", error));
        }
        Ok(())
    }
}

/// Register a new user.
///
/// Validates the request, rejects a taken username, hashes the password and
/// stores the user.
pub async fn register(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
) -> Result<User, RegistrationError> {
    request.validate()?;

    if repo.username_exists(&request.username).await? {
        return Err(RegistrationError::UsernameExists);
    }

    let password_hash = hash_password(&request.password)?;
    let new_user = NewUser::new(&request.username, password_hash).with_email(&request.email);

    let user = match repo.create(&new_user).await {
        Ok(user) => user,
        Err(e) => {
            // Lost a race with a concurrent signup for the same name.
            if repo.username_exists(&request.username).await? {
                tracing::debug!(error = %e, "Concurrent signup for the same username");
                return Err(RegistrationError::UsernameExists);
            }
            return Err(e.into());
        }
    };

    info!(user_id = user.id, username = %user.username, "New user registered");
    Ok(user)
}
