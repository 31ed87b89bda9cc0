//! CSRF protection for form posts.
//!
//! A random secret lives in the `csrftoken` cookie. Every form repeats it in
//! a hidden `csrfmiddlewaretoken` field, and [`CsrfForm`] rejects a POST
//! whose field does not match the cookie with 403. A cross-site page can
//! make the browser send the cookie but cannot read it to fill the field.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::auth::generate_token;
use crate::web::error::WebError;
use crate::web::handlers::AppState;

/// Cookie holding the CSRF secret.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Form field repeating the CSRF secret.
pub const CSRF_FIELD_NAME: &str = "csrfmiddlewaretoken";

/// The request's CSRF secret.
///
/// Taken from the cookie when it holds a well-formed token, otherwise freshly
/// generated. A fresh token is only sent back as a cookie if a handler
/// actually put it in a page.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    value: String,
    issued: Arc<AtomicBool>,
}

impl CsrfToken {
    fn new(value: String) -> Self {
        Self {
            value,
            issued: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The token to embed in a form.
    pub fn issue(&self) -> &str {
        self.issued.store(true, Ordering::Relaxed);
        &self.value
    }

    fn was_issued(&self) -> bool {
        self.issued.load(Ordering::Relaxed)
    }

    /// Check a submitted token against this one in constant time.
    pub fn verify(&self, submitted: &str) -> bool {
        let expected = self.value.as_bytes();
        let submitted = submitted.as_bytes();
        if expected.len() != submitted.len() {
            return false;
        }
        expected
            .iter()
            .zip(submitted)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Tokens are 64 lowercase hex characters, as made by [`generate_token`].
fn is_well_formed(token: &str) -> bool {
    token.len() == 64 && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Build the CSRF cookie.
pub fn csrf_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE_NAME, value))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie with a brand new secret, set when the user logs in or signs up.
pub fn rotated_csrf_cookie(secure: bool) -> Cookie<'static> {
    csrf_cookie(generate_token(), secure)
}

/// Middleware attaching a [`CsrfToken`] to every request.
pub async fn csrf_cookie_layer(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(CSRF_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| is_well_formed(value));
    let fresh = existing.is_none();
    let token = CsrfToken::new(existing.unwrap_or_else(generate_token));

    request.extensions_mut().insert(token.clone());
    let response = next.run(request).await;

    if fresh && token.was_issued() {
        let cookie = csrf_cookie(token.value, state.config.session.secure_cookie);
        (jar.add(cookie), response).into_response()
    } else {
        response
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CsrfToken>()
            .cloned()
            .ok_or_else(|| WebError::Internal("CSRF middleware not installed".to_string()))
    }
}

/// A form carrying the hidden CSRF field.
pub trait CsrfProtected {
    /// The submitted `csrfmiddlewaretoken` value.
    fn csrf_token(&self) -> &str;
}

/// A form body whose CSRF field matched the request's cookie.
///
/// A missing or wrong token is a 403.
#[derive(Debug, Clone)]
pub struct CsrfForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for CsrfForm<T>
where
    T: DeserializeOwned + CsrfProtected,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let expected = req.extensions().get::<CsrfToken>().cloned();
        let path = req.uri().path().to_string();
        let Form(form) = Form::<T>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match expected {
            Some(token) if token.verify(form.csrf_token()) => Ok(CsrfForm(form)),
            _ => {
                warn!(path = %path, "CSRF verification failed");
                Err(WebError::Forbidden.into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Database};
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use serde::Deserialize;
    use tower::util::ServiceExt;

    const TOKEN: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

    #[derive(Deserialize)]
    struct NoteForm {
        #[serde(default)]
        note: String,
        #[serde(default, rename = "csrfmiddlewaretoken")]
        csrf_token: String,
    }

    impl CsrfProtected for NoteForm {
        fn csrf_token(&self) -> &str {
            &self.csrf_token
        }
    }

    async fn show(token: CsrfToken) -> String {
        token.issue().to_string()
    }

    async fn quiet(_token: CsrfToken) -> &'static str {
        "quiet"
    }

    async fn submit(CsrfForm(form): CsrfForm<NoteForm>) -> String {
        form.note
    }

    async fn app() -> Router {
        let db = Database::open_in_memory().await.unwrap();
        let state = Arc::new(AppState::new(db, Config::default()).unwrap());
        Router::new()
            .route("/form", get(show).post(submit))
            .route("/quiet", get(quiet))
            .layer(middleware::from_fn_with_state(state.clone(), csrf_cookie_layer))
            .with_state(state)
    }

    fn post(body: String, cookie: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::post("/form")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("{CSRF_COOKIE_NAME}={token}"));
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[test]
    fn test_verify() {
        let token = CsrfToken::new(TOKEN.to_string());
        assert!(token.verify(TOKEN));
        assert!(!token.verify(""));
        assert!(!token.verify(&TOKEN[1..]));
        assert!(!token.verify(&TOKEN.replace('0', "1")));
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed(TOKEN));
        assert!(is_well_formed(&generate_token()));
        assert!(!is_well_formed("short"));
        assert!(!is_well_formed(&TOKEN.to_uppercase()));
    }

    #[tokio::test]
    async fn test_issued_token_sets_cookie() {
        let response = app()
            .await
            .oneshot(HttpRequest::get("/form").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("csrftoken="));
    }

    #[tokio::test]
    async fn test_unused_token_sets_no_cookie() {
        let response = app()
            .await
            .oneshot(HttpRequest::get("/quiet").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_existing_cookie_is_reused() {
        let response = app()
            .await
            .oneshot(
                HttpRequest::get("/form")
                    .header(header::COOKIE, format!("csrftoken={TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_matching_token_accepted() {
        let body = format!("note=hi&{CSRF_FIELD_NAME}={TOKEN}");
        let response = app().await.oneshot(post(body, Some(TOKEN))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let response = app()
            .await
            .oneshot(post("note=hi".to_string(), Some(TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_wrong_token_rejected() {
        let other = "f".repeat(64);
        let body = format!("note=hi&{CSRF_FIELD_NAME}={other}");
        let response = app().await.oneshot(post(body, Some(TOKEN))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_cookie_rejected() {
        let body = format!("note=hi&{CSRF_FIELD_NAME}={TOKEN}");
        let response = app().await.oneshot(post(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
