//! Test helpers for web integration tests.
//!
//! Provides a `TestServer` over an in-memory database plus helpers for
//! seeding users, boards and topics and for logging in.

#![allow(dead_code)]

use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;
use axum_test::{TestRequest, TestResponse, TestServer};

use corkboard::board::{BoardRepository, ForumService, NewBoard, Topic};
use corkboard::db::{NewUser, User, UserRepository};
use corkboard::web::middleware::csrf::{CSRF_COOKIE_NAME, CSRF_FIELD_NAME};
use corkboard::web::{create_router, AppState};
use corkboard::{hash_password, Config, Database};

/// Password used for every seeded user.
pub const PASSWORD: &str = "abcdef123456";

/// CSRF token sent as both cookie and form field by [`TestApp::post`].
pub const CSRF_TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

/// A running test application.
pub struct TestApp {
    /// HTTP test server.
    pub server: TestServer,
    /// Database behind the server.
    pub db: Database,
}

impl TestApp {
    /// Create a test server with an in-memory database.
    pub async fn new() -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let state = Arc::new(
            AppState::new(db.clone(), Config::default()).expect("Failed to create app state"),
        );
        let router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");
        Self { server, db }
    }

    /// Create a user with [`PASSWORD`].
    pub async fn create_user(&self, username: &str) -> User {
        let hash = hash_password(PASSWORD).expect("Failed to hash password");
        UserRepository::new(self.db.pool())
            .create(&NewUser::new(username, hash).with_email(format!("{username}@doe.com")))
            .await
            .expect("Failed to create user")
    }

    /// Create a board.
    pub async fn create_board(&self, name: &str) -> i64 {
        BoardRepository::new(self.db.pool())
            .create(&NewBoard::new(name).with_description(format!("{name} board.")))
            .await
            .expect("Failed to create board")
            .id
    }

    /// Start a topic with its first post.
    pub async fn create_topic(&self, board_id: i64, user: &User, subject: &str) -> Topic {
        ForumService::new(&self.db)
            .start_topic(board_id, user.id, subject, "Lorem ipsum dolor sit amet")
            .await
            .expect("Failed to create topic")
    }

    /// Log in through the login form and return the session cookie.
    pub async fn login(&self, username: &str) -> Cookie<'static> {
        let response = self
            .post("/account/login/")
            .form(&with_csrf(&[("username", username), ("password", PASSWORD)]))
            .await;
        assert_eq!(response.status_code(), 302, "login failed for {username}");
        response.cookie("sessionid")
    }

    /// Start a POST carrying the CSRF cookie. Pair with [`with_csrf`].
    pub fn post(&self, path: &str) -> TestRequest {
        self.server
            .post(path)
            .add_cookie(Cookie::new(CSRF_COOKIE_NAME, CSRF_TOKEN))
    }

    /// Count rows in a table.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count rows")
    }
}

/// The `Location` header of a redirect.
pub fn location(response: &TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .expect("Location is not ASCII")
        .to_string()
}

/// Form fields plus the matching CSRF token field.
pub fn with_csrf<'a>(fields: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut fields = fields.to_vec();
    fields.push((CSRF_FIELD_NAME, CSRF_TOKEN));
    fields
}
