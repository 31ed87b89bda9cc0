//! `302 Found` redirects.
//!
//! `axum::response::Redirect` only offers 303, 307 and 308; browsers and
//! form posts here expect the classic 302.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Login page path.
pub const LOGIN_PATH: &str = "/account/login/";

/// A `302 Found` response pointing at `location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    location: String,
}

impl Found {
    /// Redirect to a path on this site.
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Redirect to the login page, remembering where the user was headed.
    ///
    /// `/` stays literal in the `next` value; everything else reserved is
    /// percent-encoded.
    pub fn to_login(next: &str) -> Self {
        let next = urlencoding::encode(next).replace("%2F", "/");
        Self::to(format!("{LOGIN_PATH}?next={next}"))
    }

    /// The redirect target.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl IntoResponse for Found {
    fn into_response(self) -> Response {
        let location =
            HeaderValue::try_from(self.location).unwrap_or_else(|_| HeaderValue::from_static("/"));
        (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
    }
}
