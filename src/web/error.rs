//! Error responses for the Corkboard web interface.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::ForumError;

const FORBIDDEN_PAGE: &str = include_str!("../../templates/403.html");
const NOT_FOUND_PAGE: &str = include_str!("../../templates/404.html");
const SERVER_ERROR_PAGE: &str = include_str!("../../templates/500.html");

/// Error type returned by page handlers.
///
/// Validation problems never reach this type: handlers re-render their
/// form instead.
#[derive(Debug)]
pub enum WebError {
    /// A form post whose CSRF token was missing or wrong.
    Forbidden,
    /// Missing object, parent mismatch, bad path id or page number, or a
    /// post owned by someone else.
    NotFound,
    /// Anything else. The message is logged, never shown.
    Internal(String),
}

impl WebError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Forbidden => StatusCode::FORBIDDEN,
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            WebError::Forbidden => FORBIDDEN_PAGE,
            WebError::NotFound => NOT_FOUND_PAGE,
            WebError::Internal(message) => {
                error!(error = %message, "Request failed");
                SERVER_ERROR_PAGE
            }
        };
        (status, Html(body)).into_response()
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebError::Forbidden => write!(f, "forbidden"),
            WebError::NotFound => write!(f, "not found"),
            WebError::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<ForumError> for WebError {
    fn from(err: ForumError) -> Self {
        match err {
            ForumError::NotFound(_) => WebError::NotFound,
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl From<minijinja::Error> for WebError {
    fn from(err: minijinja::Error) -> Self {
        WebError::Internal(format!("template error: {err:#}"))
    }
}

/// Result type for page handlers.
pub type WebResult<T> = std::result::Result<T, WebError>;
