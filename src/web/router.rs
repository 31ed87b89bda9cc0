//! Router configuration for the Corkboard web interface.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::error::WebError;
use super::handlers::{
    board_topics, edit_post, edit_post_form, index, login, login_form, logout, new_topic,
    new_topic_form, reply, reply_form, signup, signup_form, topic_posts, AppState,
};
use super::middleware::{csrf_cookie_layer, load_session, security_headers};

/// Create the page router.
///
/// Every request, the health check included, passes through tracing, the
/// security headers, session resolution and the CSRF cookie. Unknown paths
/// get the 404 page.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let board_routes = Router::new()
        .route("/:board_id/", get(board_topics))
        .route("/:board_id/new_topic", get(new_topic_form).post(new_topic))
        .route("/:board_id/topics/:topic_id/", get(topic_posts))
        .route(
            "/:board_id/topics/:topic_id/reply/",
            get(reply_form).post(reply),
        )
        .route(
            "/:board_id/topics/:topic_id/posts/:post_id/edit/",
            get(edit_post_form).post(edit_post),
        );

    let account_routes = Router::new()
        .route("/signup/", get(signup_form).post(signup))
        .route("/login/", get(login_form).post(login))
        .route("/logout/", get(logout).post(logout));

    Router::new()
        .route("/", get(index))
        .nest("/boards", board_routes)
        .nest("/account", account_routes)
        .merge(create_health_router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    load_session,
                ))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    csrf_cookie_layer,
                )),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> WebError {
    WebError::NotFound
}
