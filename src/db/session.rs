//! Login session storage.
//!
//! Only the SHA-256 digest of a session token is stored; the token itself
//! lives in the client's cookie.

use super::user::User;
use super::DbPool;
use crate::{ForumError, Result};

/// A stored login session.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// Session ID.
    pub id: i64,
    /// Hex SHA-256 digest of the cookie token.
    pub token_hash: String,
    /// Owner of the session.
    pub user_id: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Expiration timestamp.
    pub expires_at: String,
}

/// Data for creating a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Hex SHA-256 digest of the cookie token.
    pub token_hash: String,
    /// Owner of the session.
    pub user_id: i64,
    /// Lifetime in seconds from now.
    pub ttl_secs: u64,
}

/// Repository for session operations.
pub struct SessionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new session.
    pub async fn create(&self, new_session: &NewSession) -> Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (token_hash, user_id, expires_at)
             VALUES (?, ?, datetime('now', '+' || ? || ' seconds'))
             RETURNING id, token_hash, user_id, created_at, expires_at",
        )
        .bind(&new_session.token_hash)
        .bind(new_session.user_id)
        .bind(new_session.ttl_secs as i64)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        Ok(session)
    }

    /// Resolve a token digest to its user.
    ///
    /// Expired sessions and inactive users resolve to `None`.
    pub async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.password, u.is_active, u.date_joined, u.last_login
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = ? AND s.expires_at > datetime('now') AND u.is_active = 1",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Delete the session with the given token digest.
    ///
    /// Returns true if a session was deleted.
    pub async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all expired sessions.
    ///
    /// Returns the number of sessions deleted.
    pub async fn delete_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= datetime('now')")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count a user's sessions, expired or not.
    pub async fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
