//! Web Account Tests
//!
//! Integration tests for signup, login, logout and session handling.

mod common;

use common::{location, with_csrf, TestApp, PASSWORD};
use corkboard::db::{SessionRepository, UserRepository};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_signup_form_renders() {
    let app = TestApp::new().await;
    let response = app.server.get("/account/signup/").await;
    assert_eq!(response.status_code(), 200);

    let html = response.text();
    for field in ["username", "email", "password1", "password2"] {
        assert!(html.contains(&format!("name=\"{field}\"")), "{field}");
    }
}

#[tokio::test]
async fn test_signup_valid_logs_user_in() {
    let app = TestApp::new().await;

    let response = app
        .post("/account/signup/")
        .form(&with_csrf(&[
            ("username", "john"),
            ("email", "john@doe.com"),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ]))
        .await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(location(&response), "/");
    assert_eq!(app.count("users").await, 1);

    let cookie = response.cookie("sessionid");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));

    let home = app.server.get("/").add_cookie(cookie).await;
    let html = home.text();
    assert!(html.contains("john"));
    assert!(html.contains("Log out"));
}

#[tokio::test]
async fn test_signup_invalid_creates_nothing() {
    let app = TestApp::new().await;

    let response = app.post("/account/signup/").form(&with_csrf(&[("username", "")])).await;
    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("This field is required."));

    let response = app
        .post("/account/signup/")
        .form(&with_csrf(&[
            ("username", "john"),
            ("email", "john@doe.com"),
            ("password1", PASSWORD),
            ("password2", "something-else"),
        ]))
        .await;
    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains("The two password fields didn"));
    assert!(html.contains("value=\"john\""));
    assert!(!html.contains(PASSWORD));

    assert_eq!(app.count("users").await, 0);
    assert_eq!(app.count("sessions").await, 0);
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = TestApp::new().await;
    app.create_user("john").await;

    let response = app
        .post("/account/signup/")
        .form(&with_csrf(&[
            ("username", "John"),
            ("email", "other@doe.com"),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ]))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(response
        .text()
        .contains("A user with that username already exists."));
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_login_form_carries_next() {
    let app = TestApp::new().await;
    let response = app
        .server
        .get("/account/login/")
        .add_query_param("next", "/boards/1/new_topic")
        .await;
    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains("name=\"next\" value=\""));
    assert!(html.contains("boards") && html.contains("new_topic"));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    let john = app.create_user("john").await;

    let response = app
        .post("/account/login/")
        .form(&with_csrf(&[("username", "john"), ("password", "wrong-password")]))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(response
        .text()
        .contains("Please enter a correct username and password."));
    assert!(response.maybe_cookie("sessionid").is_none());

    let sessions = SessionRepository::new(app.db.pool())
        .count_for_user(john.id)
        .await
        .unwrap();
    assert_eq!(sessions, 0);
}

#[tokio::test]
async fn test_login_redirects_to_next() {
    let app = TestApp::new().await;
    let john = app.create_user("john").await;

    let response = app
        .post("/account/login/")
        .form(&with_csrf(&[
            ("username", "john"),
            ("password", PASSWORD),
            ("next", "/boards/1/new_topic"),
        ]))
        .await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(location(&response), "/boards/1/new_topic");

    let user = UserRepository::new(app.db.pool())
        .get_by_id(john.id)
        .await
        .unwrap()
        .unwrap();
    assert!(user.last_login.is_some());
}

#[tokio::test]
async fn test_login_ignores_offsite_next() {
    let app = TestApp::new().await;
    app.create_user("john").await;

    let response = app
        .post("/account/login/")
        .form(&with_csrf(&[
            ("username", "john"),
            ("password", PASSWORD),
            ("next", "//evil.example/"),
        ]))
        .await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_inactive_user_cannot_log_in() {
    let app = TestApp::new().await;
    let john = app.create_user("john").await;
    UserRepository::new(app.db.pool())
        .set_active(john.id, false)
        .await
        .unwrap();

    let response = app
        .post("/account/login/")
        .form(&with_csrf(&[("username", "john"), ("password", PASSWORD)]))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(app.count("sessions").await, 0);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = TestApp::new().await;
    app.create_user("john").await;
    let board = app.create_board("Django").await;
    let cookie = app.login("john").await;
    let protected = format!("/boards/{board}/new_topic");

    let before = app.server.get(&protected).add_cookie(cookie.clone()).await;
    assert_eq!(before.status_code(), 200);

    let response = app
        .post("/account/logout/")
        .add_cookie(cookie.clone())
        .await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(location(&response), "/");
    assert_eq!(app.count("sessions").await, 0);

    // The old cookie no longer authenticates.
    let after = app.server.get(&protected).add_cookie(cookie).await;
    assert_eq!(after.status_code(), 302);
    assert_eq!(
        location(&after),
        format!("/account/login/?next={protected}")
    );
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = TestApp::new().await;
    let response = app.server.get("/account/logout/").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_account_forms_contain_csrf_field() {
    let app = TestApp::new().await;
    for path in ["/account/signup/", "/account/login/"] {
        let response = app.server.get(path).await;
        assert!(
            response.text().contains("name=\"csrfmiddlewaretoken\""),
            "{path}"
        );
        let cookie = response.cookie("csrftoken");
        assert_eq!(cookie.value().len(), 64, "{path}");
    }
}

#[tokio::test]
async fn test_signup_without_csrf_token_is_forbidden() {
    let app = TestApp::new().await;

    let response = app
        .post("/account/signup/")
        .form(&[
            ("username", "john"),
            ("email", "john@doe.com"),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ])
        .await;
    assert_eq!(response.status_code(), 403);
    assert!(response.maybe_cookie("sessionid").is_none());
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn test_login_without_csrf_cookie_is_forbidden() {
    let app = TestApp::new().await;
    app.create_user("john").await;

    // The form field alone is not enough; it has to match the cookie.
    let response = app
        .server
        .post("/account/login/")
        .form(&with_csrf(&[("username", "john"), ("password", PASSWORD)]))
        .await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(app.count("sessions").await, 0);
}

#[tokio::test]
async fn test_login_rotates_csrf_token() {
    let app = TestApp::new().await;
    app.create_user("john").await;

    let response = app
        .post("/account/login/")
        .form(&with_csrf(&[("username", "john"), ("password", PASSWORD)]))
        .await;
    assert_eq!(response.status_code(), 302);
    let rotated = response.cookie("csrftoken");
    assert_eq!(rotated.value().len(), 64);
    assert_ne!(rotated.value(), common::CSRF_TOKEN);
}
