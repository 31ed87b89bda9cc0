//! Login sessions for Corkboard.
//!
//! A session is an opaque random token handed to the browser in a cookie.
//! The database only ever sees the token's SHA-256 digest.

use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use super::password::verify_password;
use crate::db::{DbPool, NewSession, SessionRepository, User, UserRepository};
use crate::ForumError;

/// Number of random bytes in a session token.
const TOKEN_BYTES: usize = 32;

/// Session-related errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Unknown username or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account is deactivated.
    #[error("account is inactive")]
    AccountInactive,

    /// Storage failure.
    #[error(transparent)]
    Storage(#[from] ForumError),
}

/// Generate a new session token (64 hex characters).
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_BYTES)
        .map(|_| format!("{:02x}", rng.random::<u8>()))
        .collect()
}

/// Digest a session token for storage.
pub fn hash_token(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Creates, resolves and ends login sessions.
pub struct SessionManager<'a> {
    pool: &'a DbPool,
    ttl_secs: u64,
}

impl<'a> SessionManager<'a> {
    /// Create a manager issuing sessions that live `ttl_secs` seconds.
    pub fn new(pool: &'a DbPool, ttl_secs: u64) -> Self {
        Self { pool, ttl_secs }
    }

    /// Check credentials and open a session.
    ///
    /// Returns the user and the cookie token.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, String), SessionError> {
        let users = UserRepository::new(self.pool);
        let user = users
            .get_by_username(username)
            .await?
            .ok_or(SessionError::InvalidCredentials)?;

        verify_password(password, &user.password).map_err(|_| {
            debug!(username = %user.username, "Password mismatch");
            SessionError::InvalidCredentials
        })?;

        if !user.is_active {
            return Err(SessionError::AccountInactive);
        }

        users.update_last_login(user.id).await?;
        let token = self.start(user.id).await?;
        info!(user_id = user.id, username = %user.username, "User logged in");
        Ok((user, token))
    }

    /// Open a session for a user whose identity is already established.
    pub async fn start(&self, user_id: i64) -> Result<String, ForumError> {
        let token = generate_token();
        SessionRepository::new(self.pool)
            .create(&NewSession {
                token_hash: hash_token(&token),
                user_id,
                ttl_secs: self.ttl_secs,
            })
            .await?;
        Ok(token)
    }

    /// Resolve a cookie token to its user.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>, ForumError> {
        SessionRepository::new(self.pool)
            .find_user_by_token_hash(&hash_token(token))
            .await
    }

    /// End the session identified by a cookie token.
    pub async fn logout(&self, token: &str) -> Result<bool, ForumError> {
        let removed = SessionRepository::new(self.pool)
            .delete_by_token_hash(&hash_token(token))
            .await?;
        if removed {
            debug!("Session ended");
        }
        Ok(removed)
    }

    /// Delete every expired session.
    pub async fn purge_expired(&self) -> Result<u64, ForumError> {
        SessionRepository::new(self.pool).delete_expired().await
    }
}
