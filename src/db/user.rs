//! User model for Corkboard.

use serde::Serialize;

/// A registered user.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique, case-insensitive).
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password hash (Argon2id PHC string).
    #[serde(skip_serializing)]
    pub password: String,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Account creation timestamp.
    pub date_joined: String,
    /// Last login timestamp, if the user has ever logged in.
    pub last_login: Option<String>,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password hash (must already be hashed).
    pub password: String,
}

impl NewUser {
    /// Create a new user from a username and an already hashed password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: String::new(),
            password: password.into(),
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}
